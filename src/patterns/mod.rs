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

//! # Flow Patterns
//!
//! This module contains the contracts for the four pattern kinds. A pattern
//! is a stateless, deterministic strategy which compiles a topology entity
//! into the flow rules that realize it in the data plane:
//!
//! - **[`PathPattern`]**: compiles a [`NetworkPath`] into a mapping of
//!   forwarding element to ordered rules.
//!
//! - **[`BroadcastPattern`]**: compiles a whole [`BroadcastDomain`] (a set
//!   of paths sharing flooding scope) into one such mapping.
//!
//! - **[`ChainPattern`]**: compiles a [`ServiceChain`] into an ordered
//!   *sequence* of rule mappings, one per traversal segment (ingress
//!   segment, mid segments, egress segment).
//!
//! - **[`BridgePattern`]**: compiles a single forwarding element into a flat
//!   rule list. Bridge rules always target the triggering element, so the
//!   result is not partitioned per element.
//!
//! Concrete pattern implementations live outside this crate; the engine only
//! relies on the contracts defined here.
//!
//! ## Selection
//!
//! Which registered pattern handles a given event is decided by a
//! [`PatternSelector`]. The default [`PositionalSelector`] implements the
//! historically fixed policy: path, broadcast and bridge events use the
//! pattern registered first, chain events use the pattern registered
//! *second* (see [`MIN_CHAIN_PATTERNS`]). Selection by entity attributes or
//! operator policy is a known extension point: implement [`PatternSelector`]
//! and hand it to the engine at construction.

use crate::topology::{BroadcastDomain, NetworkPath, ServiceChain};
use crate::types::{ElementId, FlowRule};
use std::collections::HashMap;

mod selector;
pub use selector::{PatternSelector, PositionalSelector};

/// Minimum number of chain patterns that must be registered before chain
/// events can be handled. The positional selection policy addresses the
/// chain pattern at index 1, so wiring fewer than two chain patterns is a
/// precondition violation, reported as
/// [`Error::ChainPatternUnderflow`](crate::Error::ChainPatternUnderflow).
pub const MIN_CHAIN_PATTERNS: usize = 2;

/// Rules to be installed on (or removed from) the data plane, keyed by the
/// forwarding element that must carry them.
pub type RuleMap = HashMap<ElementId, Vec<FlowRule>>;

/// Strategy compiling a [`NetworkPath`] into flow rules.
pub trait PathPattern: Send + Sync {
    /// Compile the path into rules per forwarding element.
    fn apply(&self, path: &NetworkPath) -> RuleMap;
}

/// Strategy compiling a [`BroadcastDomain`] into flow rules.
pub trait BroadcastPattern: Send + Sync {
    /// Compile the whole domain into rules per forwarding element.
    fn apply(&self, domain: &BroadcastDomain) -> RuleMap;
}

/// Strategy compiling a [`ServiceChain`] into flow rules, one rule mapping
/// per traversal segment, in traversal order.
pub trait ChainPattern: Send + Sync {
    /// Compile the chain into an ordered sequence of per-segment rule
    /// mappings.
    fn apply(&self, chain: &ServiceChain) -> Vec<RuleMap>;
}

/// Strategy compiling a single forwarding element into flow rules.
pub trait BridgePattern: Send + Sync {
    /// Compile the element into the flat rule list it must carry.
    fn apply(&self, element: ElementId) -> Vec<FlowRule>;
}
