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

//! # Reactive Address Learning
//!
//! A service chain is programmed with static rules when it is created, but
//! the rules steering traffic of individual endpoints can only be written
//! once their addresses are learned at runtime. The
//! [`AddressLearningWriter`] is the per-chain agent responsible for those
//! dynamic rules: the engine builds one writer per created chain, registers
//! it with the external [`ReactiveListener`], and shuts it down again when
//! the chain is deleted.
//!
//! The learning protocol itself, and the rules the writer derives from a
//! learned address, are external collaborator concerns. This module only
//! fixes the lifecycle contract: construction from a chain (including the
//! boundary-port computation), registration, and idempotent shutdown.

use crate::programmer::RuleProgrammer;
use crate::topology::{ServiceChain, TopologyError};
use crate::types::{ChainId, ElementId, PortId};
use crate::Shutdown;
use log::*;
use std::sync::Arc;

/// External registry for address-learning agents. Registration makes the
/// writer receive learned-address events; unregistration stops them.
pub trait ReactiveListener: Send + Sync {
    /// Start delivering learned-address events to `writer`.
    fn register_address_listener(&self, writer: Arc<AddressLearningWriter>);

    /// Stop delivering learned-address events to `writer`.
    fn unregister_address_listener(&self, writer: &Arc<AddressLearningWriter>);
}

/// Per-chain agent installing dynamic flow rules in response to learned
/// addressing information.
///
/// The writer captures everything the learning algorithm needs to place a
/// rule along the chain: the chain endpoints, the boundary ports on the
/// begin and end bridge, the effective hop count, and the programmer handle
/// used to issue the rules.
pub struct AddressLearningWriter {
    chain_id: ChainId,
    begin_element: ElementId,
    end_element: ElementId,
    begin_port: PortId,
    begin_bridge_end_port: PortId,
    end_bridge_begin_port: PortId,
    end_port: PortId,
    effective_hops: u32,
    programmer: Arc<dyn RuleProgrammer>,
    shutdown: Shutdown,
}

impl AddressLearningWriter {
    /// Build the writer for a service chain.
    ///
    /// The boundary ports depend on whether the chain's outermost paths are
    /// degenerate (begin and end element coincide):
    ///
    /// - `begin_bridge_end_port` is the begin path's end port if that path
    ///   is degenerate, and otherwise the begin path's link port towards the
    ///   next element, relative to its begin element.
    /// - `end_bridge_begin_port` is the end path's begin port if that path
    ///   is degenerate, and otherwise the end path's link port towards the
    ///   previous element, relative to its end element.
    /// - the effective hop count is the chain's stated hop count, minus one
    ///   if the end path is degenerate.
    pub fn from_chain(
        chain: &ServiceChain,
        programmer: Arc<dyn RuleProgrammer>,
    ) -> Result<Self, TopologyError> {
        let begin = chain.begin();
        let end = chain.end();

        let begin_bridge_end_port = if begin.is_degenerate() {
            begin.end_port()
        } else {
            begin
                .next_link(begin.begin_element())
                .ok_or_else(|| TopologyError::DetachedElement(begin.begin_element()))?
        };

        let end_bridge_begin_port = if end.is_degenerate() {
            end.begin_port()
        } else {
            end.previous_link(end.end_element())
                .ok_or_else(|| TopologyError::DetachedElement(end.end_element()))?
        };

        // stated hop counts below 1 must not underflow the adjustment
        let effective_hops = if end.is_degenerate() {
            chain.num_hops().saturating_sub(1)
        } else {
            chain.num_hops()
        };

        Ok(Self {
            chain_id: chain.id(),
            begin_element: begin.begin_element(),
            end_element: end.end_element(),
            begin_port: begin.begin_port(),
            begin_bridge_end_port,
            end_bridge_begin_port,
            end_port: end.end_port(),
            effective_hops,
            programmer,
            shutdown: Shutdown::new(),
        })
    }

    /// The chain this writer serves.
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// The forwarding element at the chain ingress.
    pub fn begin_element(&self) -> ElementId {
        self.begin_element
    }

    /// The forwarding element at the chain egress.
    pub fn end_element(&self) -> ElementId {
        self.end_element
    }

    /// The true chain-endpoint port at the ingress.
    pub fn begin_port(&self) -> PortId {
        self.begin_port
    }

    /// The port on the begin bridge which leads into the chain.
    pub fn begin_bridge_end_port(&self) -> PortId {
        self.begin_bridge_end_port
    }

    /// The port on the end bridge which leads back into the chain.
    pub fn end_bridge_begin_port(&self) -> PortId {
        self.end_bridge_begin_port
    }

    /// The true chain-endpoint port at the egress.
    pub fn end_port(&self) -> PortId {
        self.end_port
    }

    /// The hop count the dynamic rules must account for.
    pub fn effective_hops(&self) -> u32 {
        self.effective_hops
    }

    /// The programmer through which the writer issues its dynamic rules.
    pub fn programmer(&self) -> &Arc<dyn RuleProgrammer> {
        &self.programmer
    }

    /// Stop issuing dynamic rules. Idempotent: safe to call repeatedly and
    /// concurrently, also while rule operations of the writer are still in
    /// flight.
    pub fn shut_down(&self) {
        if self.shutdown.trigger() {
            info!("Shutting down address-learning writer of chain {:?}", self.chain_id);
        }
    }

    /// Whether the writer was shut down.
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_shutdown()
    }
}
