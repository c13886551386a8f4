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

//! Pattern selection policy

use super::{BridgePattern, BroadcastPattern, ChainPattern, PathPattern, MIN_CHAIN_PATTERNS};
use crate::topology::{BroadcastDomain, NetworkPath, ServiceChain};
use crate::types::ElementId;
use crate::Error;
use std::sync::Arc;

/// Policy deciding which registered pattern handles a given topology event.
///
/// The selector receives the append-only registry slice for the event kind
/// together with the triggering entity and returns the chosen pattern, or an
/// error if the registry does not satisfy the policy's preconditions.
pub trait PatternSelector: Send + Sync {
    /// Choose the path pattern for a path event.
    fn select_path(
        &self,
        registered: &[Arc<dyn PathPattern>],
        path: &NetworkPath,
    ) -> Result<Arc<dyn PathPattern>, Error>;

    /// Choose the broadcast pattern for a broadcast-domain event.
    fn select_broadcast(
        &self,
        registered: &[Arc<dyn BroadcastPattern>],
        domain: &BroadcastDomain,
    ) -> Result<Arc<dyn BroadcastPattern>, Error>;

    /// Choose the chain pattern for a service-chain event.
    fn select_chain(
        &self,
        registered: &[Arc<dyn ChainPattern>],
        chain: &ServiceChain,
    ) -> Result<Arc<dyn ChainPattern>, Error>;

    /// Choose the bridge pattern for a forwarding-element event.
    fn select_bridge(
        &self,
        registered: &[Arc<dyn BridgePattern>],
        element: ElementId,
    ) -> Result<Arc<dyn BridgePattern>, Error>;
}

/// The default, historically fixed selection policy.
///
/// Path, broadcast and bridge events always use the first registered
/// pattern; chain events always use the second (requiring
/// [`MIN_CHAIN_PATTERNS`] registered chain patterns). The entity itself is
/// ignored. Test scenarios depend on this observable behavior, so it must
/// not change silently.
#[derive(Debug, Clone, Default)]
pub struct PositionalSelector;

impl PatternSelector for PositionalSelector {
    fn select_path(
        &self,
        registered: &[Arc<dyn PathPattern>],
        _path: &NetworkPath,
    ) -> Result<Arc<dyn PathPattern>, Error> {
        registered.first().cloned().ok_or(Error::NoRegisteredPattern("path"))
    }

    fn select_broadcast(
        &self,
        registered: &[Arc<dyn BroadcastPattern>],
        _domain: &BroadcastDomain,
    ) -> Result<Arc<dyn BroadcastPattern>, Error> {
        registered.first().cloned().ok_or(Error::NoRegisteredPattern("broadcast"))
    }

    fn select_chain(
        &self,
        registered: &[Arc<dyn ChainPattern>],
        _chain: &ServiceChain,
    ) -> Result<Arc<dyn ChainPattern>, Error> {
        if registered.len() < MIN_CHAIN_PATTERNS {
            return Err(Error::ChainPatternUnderflow { registered: registered.len() });
        }
        Ok(registered[1].clone())
    }

    fn select_bridge(
        &self,
        registered: &[Arc<dyn BridgePattern>],
        _element: ElementId,
    ) -> Result<Arc<dyn BridgePattern>, Error> {
        registered.first().cloned().ok_or(Error::NoRegisteredPattern("bridge"))
    }
}
