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

//! Module containing all error types

use crate::topology::TopologyError;
use thiserror::Error;

/// Main error type
///
/// Errors raised by the event handlers are precondition failures (no pattern
/// registered, malformed topology entity). Failures of individual rule
/// operations are *not* raised here; they are recorded in the outcome tables
/// and must be observed through the query API.
#[derive(Debug, Error)]
pub enum Error {
    /// Error propagated from the topology entities
    #[error("Topology Error: {0}")]
    TopologyError(#[from] TopologyError),
    /// A path or broadcast or bridge event fired, but no pattern of the
    /// required kind was registered.
    #[error("No {0} pattern is registered!")]
    NoRegisteredPattern(&'static str),
    /// A chain event fired with fewer than
    /// [`MIN_CHAIN_PATTERNS`](crate::patterns::MIN_CHAIN_PATTERNS) chain
    /// patterns registered. The positional selector uses the pattern at
    /// index 1, so registration of at least two chain patterns is a wiring
    /// precondition.
    #[error("Only {registered} chain pattern(s) registered, but at least 2 are required!")]
    ChainPatternUnderflow {
        /// Number of chain patterns registered at the time of the event.
        registered: usize,
    },
}
