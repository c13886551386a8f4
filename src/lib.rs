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

#![deny(missing_docs)]

//! # Flowsync: Reconciling Data-Plane Flow Tables with Topology Intent
//!
//! This is a library implementing the flow-programming control loop of a
//! software-defined-network controller. It reacts to topology lifecycle
//! events (point-to-point paths, broadcast domains, multi-hop service chains
//! and individual forwarding elements), compiles each event into a set of
//! flow rules using a pluggable pattern, drives the asynchronous
//! installation or removal of those rules against the affected forwarding
//! elements, and records whether each operation set ultimately succeeded or
//! failed.
//!
//! ## Structure
//!
//! This library is structured in the following way:
//!
//! - **[`topology`]**: The entities the engine reacts to: [`NetworkPath`],
//!   [`BroadcastDomain`] and [`ServiceChain`]. These are constructed and
//!   owned by the external topology layer; the engine only consumes them.
//!
//! - **[`patterns`]**: Contracts for the four pattern kinds (path,
//!   broadcast, chain, bridge). A pattern is a stateless strategy which
//!   compiles a topology entity into flow rules per forwarding element. The
//!   module also contains the [`PatternSelector`](patterns::PatternSelector)
//!   trait, deciding which registered pattern handles a given event, with
//!   the default [`PositionalSelector`](patterns::PositionalSelector).
//!
//! - **[`programmer`]**: The [`RuleProgrammer`](programmer::RuleProgrammer)
//!   boundary, which asynchronously installs or removes a single rule on a
//!   forwarding element. The transport behind it (OpenFlow, P4Runtime, ...)
//!   is not part of this crate.
//!
//! - **[`reactive`]**: The per-chain
//!   [`AddressLearningWriter`](reactive::AddressLearningWriter), an agent
//!   which installs dynamic rules in response to learned addressing
//!   information, together with the
//!   [`ReactiveListener`](reactive::ReactiveListener) registration contract.
//!
//! - **[`engine`]**: The reconciliation core,
//!   [`FlowConnectionManager`](engine::FlowConnectionManager). It subscribes
//!   to topology notifications, selects and applies patterns, submits rules
//!   to the programmer, tracks per-entity outcomes, runs the broadcast
//!   invalidation scan and manages writer lifecycles.
//!
//! ## Usage
//!
//! ```
//! use flowsync::engine::FlowConnectionManager;
//! use flowsync::patterns::PathPattern;
//! use flowsync::programmer::{ProgramError, RuleProgrammer};
//! use flowsync::reactive::{AddressLearningWriter, ReactiveListener};
//! use flowsync::{ElementId, FlowRule, NetworkPath};
//! use async_trait::async_trait;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! struct NoopProgrammer;
//!
//! #[async_trait]
//! impl RuleProgrammer for NoopProgrammer {
//!     async fn install(&self, _: FlowRule, _: ElementId) -> Result<(), ProgramError> {
//!         Ok(())
//!     }
//!     async fn remove(&self, _: FlowRule, _: ElementId) -> Result<(), ProgramError> {
//!         Ok(())
//!     }
//! }
//!
//! struct NoopListener;
//!
//! impl ReactiveListener for NoopListener {
//!     fn register_address_listener(&self, _: Arc<AddressLearningWriter>) {}
//!     fn unregister_address_listener(&self, _: &Arc<AddressLearningWriter>) {}
//! }
//!
//! struct Drop2;
//!
//! impl PathPattern for Drop2 {
//!     fn apply(&self, path: &NetworkPath) -> HashMap<ElementId, Vec<FlowRule>> {
//!         let rule = FlowRule::new(0, 100, "in_port=2", vec!["drop".to_string()]);
//!         vec![(path.begin_element(), vec![rule])].into_iter().collect()
//!     }
//! }
//!
//! let mut manager = FlowConnectionManager::new(
//!     Arc::new(NoopProgrammer),
//!     Arc::new(NoopListener),
//! );
//! manager.register_path_pattern(Arc::new(Drop2));
//! // from here on, feed topology notifications into the manager
//! ```

pub mod engine;
mod error;
pub mod patterns;
pub mod programmer;
pub mod reactive;
mod test;
pub mod topology;
mod types;

pub use error::Error;
pub use topology::{BroadcastDomain, Hop, NetworkPath, ServiceChain, TopologyError};
pub use types::{ChainId, ElementId, FlowRule, PortId};

use std::sync::{Arc, RwLock};

/// Shutdown handle, to check whether an agent was told to stop, or to send
/// the shutdown command. Cloning yields a handle to the same flag.
#[derive(Clone, Debug)]
pub struct Shutdown {
    b: Arc<RwLock<bool>>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    /// Create a new shutdown handle, initially not triggered.
    pub fn new() -> Self {
        Self { b: Arc::new(RwLock::new(false)) }
    }

    /// Send the shutdown command. Returns `true` if this call was the one
    /// that triggered the shutdown, and `false` if it was already triggered
    /// before. This function will block until the write lock can be
    /// acquired.
    pub fn trigger(&self) -> bool {
        let mut b = self.b.write().unwrap();
        let first = !*b;
        *b = true;
        first
    }

    /// Checks if the shutdown flag is set. This function will block until
    /// the read lock can be acquired.
    pub fn is_shutdown(&self) -> bool {
        *self.b.read().unwrap()
    }
}
