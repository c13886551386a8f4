// Flowsync: Reconciling Data-Plane Flow Tables with Topology Intent
// Copyright (C) 2026  The Flowsync Authors
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Rule Programmer
//!
//! The asynchronous transport boundary through which the engine installs or
//! removes a single flow rule on a forwarding element. The concrete
//! transport (OpenFlow connection, P4Runtime channel, ...) lives outside
//! this crate.
//!
//! The engine treats every call as independent: it requires no ordering,
//! batching or idempotency guarantees from the programmer, never retries a
//! failed operation, and does not cancel operations in flight.

use crate::types::{ElementId, FlowRule};
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single rule install/remove operation.
///
/// The engine does not distinguish transient from permanent failures; both
/// surface identically and are recorded, not retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// The forwarding element rejected the rule.
    #[error("Element {0:?} rejected the rule: {1}")]
    Rejected(ElementId, String),
    /// The forwarding element could not be reached.
    #[error("Element {0:?} is unreachable")]
    Unreachable(ElementId),
}

/// Asynchronous install/remove transport towards forwarding elements.
#[async_trait]
pub trait RuleProgrammer: Send + Sync {
    /// Install `rule` on `element`, completing with the outcome.
    async fn install(&self, rule: FlowRule, element: ElementId) -> Result<(), ProgramError>;

    /// Remove `rule` from `element`, completing with the outcome.
    async fn remove(&self, rule: FlowRule, element: ElementId) -> Result<(), ProgramError>;
}
