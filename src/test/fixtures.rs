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

//! Shared mock collaborators and topology builders for the tests.

use crate::patterns::{BridgePattern, BroadcastPattern, ChainPattern, PathPattern, RuleMap};
use crate::programmer::{ProgramError, RuleProgrammer};
use crate::reactive::{AddressLearningWriter, ReactiveListener};
use crate::topology::{BroadcastDomain, Hop, NetworkPath, ServiceChain};
use crate::types::{ChainId, ElementId, FlowRule, PortId};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// One call the mock programmer received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Install(ElementId, FlowRule),
    Remove(ElementId, FlowRule),
}

/// Rule programmer recording every call, with scripted per-rule failures.
#[derive(Default)]
pub struct MockProgrammer {
    calls: Mutex<Vec<Call>>,
    fail_rules: Mutex<HashSet<FlowRule>>,
}

impl MockProgrammer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every operation on `rule` fail from now on.
    pub fn fail_on(&self, rule: FlowRule) {
        self.fail_rules.lock().unwrap().insert(rule);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn installs(&self) -> Vec<(ElementId, FlowRule)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Install(e, r) => Some((e, r)),
                Call::Remove(_, _) => None,
            })
            .collect()
    }

    pub fn removes(&self) -> Vec<(ElementId, FlowRule)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Remove(e, r) => Some((e, r)),
                Call::Install(_, _) => None,
            })
            .collect()
    }

    fn outcome(&self, rule: &FlowRule, element: ElementId) -> Result<(), ProgramError> {
        if self.fail_rules.lock().unwrap().contains(rule) {
            Err(ProgramError::Rejected(element, "scripted failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RuleProgrammer for MockProgrammer {
    async fn install(&self, rule: FlowRule, element: ElementId) -> Result<(), ProgramError> {
        self.calls.lock().unwrap().push(Call::Install(element, rule.clone()));
        self.outcome(&rule, element)
    }

    async fn remove(&self, rule: FlowRule, element: ElementId) -> Result<(), ProgramError> {
        self.calls.lock().unwrap().push(Call::Remove(element, rule.clone()));
        self.outcome(&rule, element)
    }
}

/// Rule programmer whose operations panic, aborting the rule task.
pub struct PanickingProgrammer;

#[async_trait]
impl RuleProgrammer for PanickingProgrammer {
    async fn install(&self, _: FlowRule, _: ElementId) -> Result<(), ProgramError> {
        panic!("install failure")
    }

    async fn remove(&self, _: FlowRule, _: ElementId) -> Result<(), ProgramError> {
        panic!("remove failure")
    }
}

/// Reactive listener recording registrations and unregistrations.
#[derive(Default)]
pub struct MockListener {
    registered: Mutex<Vec<Arc<AddressLearningWriter>>>,
    unregistered: Mutex<Vec<Arc<AddressLearningWriter>>>,
}

impl MockListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn registered(&self) -> Vec<Arc<AddressLearningWriter>> {
        self.registered.lock().unwrap().clone()
    }

    pub fn unregistered(&self) -> Vec<Arc<AddressLearningWriter>> {
        self.unregistered.lock().unwrap().clone()
    }
}

impl ReactiveListener for MockListener {
    fn register_address_listener(&self, writer: Arc<AddressLearningWriter>) {
        self.registered.lock().unwrap().push(writer);
    }

    fn unregister_address_listener(&self, writer: &Arc<AddressLearningWriter>) {
        self.unregistered.lock().unwrap().push(writer.clone());
    }
}

/// Path pattern returning a fixed rule map for any path.
pub struct StaticPathPattern(pub RuleMap);

impl PathPattern for StaticPathPattern {
    fn apply(&self, _path: &NetworkPath) -> RuleMap {
        self.0.clone()
    }
}

/// Broadcast pattern deriving one flood rule per member path, placed on the
/// path's begin element and matching its begin port. Distinct domains thus
/// compile into distinguishable rule sets.
pub struct PerPathBroadcastPattern;

impl BroadcastPattern for PerPathBroadcastPattern {
    fn apply(&self, domain: &BroadcastDomain) -> RuleMap {
        let mut map = RuleMap::new();
        for path in domain {
            map.entry(path.begin_element()).or_insert_with(Vec::new).push(FlowRule::new(
                0,
                100,
                &format!("in_port={}", path.begin_port().0),
                vec!["flood".to_string()],
            ));
        }
        map
    }
}

/// Chain pattern returning fixed per-segment rule maps for any chain.
pub struct StaticChainPattern(pub Vec<RuleMap>);

impl ChainPattern for StaticChainPattern {
    fn apply(&self, _chain: &ServiceChain) -> Vec<RuleMap> {
        self.0.clone()
    }
}

/// Bridge pattern returning a fixed rule list for any element.
pub struct StaticBridgePattern(pub Vec<FlowRule>);

impl BridgePattern for StaticBridgePattern {
    fn apply(&self, _element: ElementId) -> Vec<FlowRule> {
        self.0.clone()
    }
}

/// Build a path from `(element, ingress port, egress port)` triples.
pub fn path(hops: &[(u32, u64, u64)]) -> NetworkPath {
    NetworkPath::new(
        hops.iter().map(|&(e, i, o)| Hop::new(ElementId(e), PortId(i), PortId(o))).collect(),
    )
    .unwrap()
}

/// Build a chain from its id, paths and stated hop count.
pub fn chain(id: u32, paths: Vec<NetworkPath>, hops: u32) -> ServiceChain {
    ServiceChain::new(ChainId(id), paths, hops).unwrap()
}

/// A rule distinguishable by its priority.
pub fn rule(priority: u16) -> FlowRule {
    FlowRule::new(0, priority, "dl_type=0x0800", vec!["output:1".to_string()])
}
