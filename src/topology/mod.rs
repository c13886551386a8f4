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

//! # Topology Entities
//!
//! The entities the reconciliation engine reacts to. All of them are created
//! and destroyed by the external topology layer; the engine never originates
//! or mutates them. A topology update is therefore modeled as
//! delete-old/create-new, never as in-place mutation, and all entities are
//! comparable by value so that a rebuilt entity with equal content still
//! reconciles against previously recorded program state.

use crate::types::{ChainId, ElementId, PortId};
use std::collections::BTreeSet;
use thiserror::Error;

/// Topology Error
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TopologyError {
    /// A network path must traverse at least one forwarding element.
    #[error("A network path must contain at least one hop!")]
    EmptyPath,
    /// A service chain must compose at least two network paths.
    #[error("A service chain must compose at least two paths, got {paths}!")]
    ChainTooShort {
        /// Number of paths the chain was built from
        paths: usize,
    },
    /// A link port was requested relative to an element which does not lie
    /// on the path.
    #[error("Element {0:?} does not lie on the path!")]
    DetachedElement(ElementId),
}

/// One traversal step of a [`NetworkPath`]: the forwarding element together
/// with the port the path enters through and the port it leaves through.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct Hop {
    /// The forwarding element traversed by this hop
    pub element: ElementId,
    /// Port through which the path enters the element
    pub ingress: PortId,
    /// Port through which the path leaves the element
    pub egress: PortId,
}

impl Hop {
    /// Create a new hop.
    pub fn new(element: ElementId, ingress: PortId, egress: PortId) -> Self {
        Self { element, ingress, egress }
    }
}

/// An ordered point-to-point route across one or more forwarding elements,
/// from a begin port to an end port.
///
/// Paths are immutable once constructed. The begin port is the ingress of
/// the first hop, the end port the egress of the last hop. A path whose
/// begin and end element coincide is *degenerate* (a single-element path),
/// which affects hop counting and port selection for service chains.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone)]
pub struct NetworkPath {
    hops: Vec<Hop>,
}

impl NetworkPath {
    /// Create a new path from an ordered hop sequence.
    pub fn new(hops: Vec<Hop>) -> Result<Self, TopologyError> {
        if hops.is_empty() {
            return Err(TopologyError::EmptyPath);
        }
        Ok(Self { hops })
    }

    /// The ordered hop sequence.
    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    /// The forwarding element at the begin of the path.
    pub fn begin_element(&self) -> ElementId {
        self.hops[0].element
    }

    /// The forwarding element at the end of the path.
    pub fn end_element(&self) -> ElementId {
        self.hops[self.hops.len() - 1].element
    }

    /// The port where the path begins.
    pub fn begin_port(&self) -> PortId {
        self.hops[0].ingress
    }

    /// The port where the path ends.
    pub fn end_port(&self) -> PortId {
        self.hops[self.hops.len() - 1].egress
    }

    /// The port on `element` which links towards the next element on the
    /// path, or `None` if the element does not lie on the path.
    pub fn next_link(&self, element: ElementId) -> Option<PortId> {
        self.hops.iter().find(|h| h.element == element).map(|h| h.egress)
    }

    /// The port on `element` which links towards the previous element on the
    /// path, or `None` if the element does not lie on the path.
    pub fn previous_link(&self, element: ElementId) -> Option<PortId> {
        self.hops.iter().find(|h| h.element == element).map(|h| h.ingress)
    }

    /// Whether begin and end element coincide (single-element path).
    pub fn is_degenerate(&self) -> bool {
        self.begin_element() == self.end_element()
    }
}

/// A set of [`NetworkPath`]s sharing flooding scope.
///
/// The set itself (compared by value) is the key under which program
/// outcomes are recorded: two sets are equal exactly if their member paths
/// are equal, so a freshly built set still matches earlier records.
pub type BroadcastDomain = BTreeSet<NetworkPath>;

/// An ordered composition of two or more [`NetworkPath`]s representing a
/// multi-hop service insertion, together with its chain identifier and the
/// stated number of hops.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone)]
pub struct ServiceChain {
    id: ChainId,
    paths: Vec<NetworkPath>,
    hops: u32,
}

impl ServiceChain {
    /// Create a new service chain from at least two paths.
    pub fn new(id: ChainId, paths: Vec<NetworkPath>, hops: u32) -> Result<Self, TopologyError> {
        if paths.len() < 2 {
            return Err(TopologyError::ChainTooShort { paths: paths.len() });
        }
        Ok(Self { id, paths, hops })
    }

    /// The chain identifier.
    pub fn id(&self) -> ChainId {
        self.id
    }

    /// The ordered paths composing the chain.
    pub fn paths(&self) -> &[NetworkPath] {
        &self.paths
    }

    /// The first path of the chain.
    pub fn begin(&self) -> &NetworkPath {
        &self.paths[0]
    }

    /// The last path of the chain.
    pub fn end(&self) -> &NetworkPath {
        &self.paths[self.paths.len() - 1]
    }

    /// The stated number of hops of the chain.
    pub fn num_hops(&self) -> u32 {
        self.hops
    }
}
