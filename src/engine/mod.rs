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

//! # Reconciliation Engine
//!
//! The [`FlowConnectionManager`] is the flow-programming control loop: it
//! consumes topology lifecycle notifications, compiles each entity into flow
//! rules through the selected [pattern](crate::patterns), submits every rule
//! asynchronously to the [`RuleProgrammer`](crate::programmer::RuleProgrammer),
//! and records per-entity success or failure in the
//! [`OutcomeTable`]s. For service chains it additionally manages the
//! lifecycle of the per-chain
//! [`AddressLearningWriter`](crate::reactive::AddressLearningWriter).
//!
//! ## Concurrency
//!
//! Event handlers never block: they validate preconditions, spawn one tokio
//! task per rule operation (or one per dispatch, see [`RecordPolicy`]) and
//! return. All handlers must therefore be invoked from within a tokio
//! runtime. Completions land on worker tasks and mutate the outcome tables
//! through atomic record operations; no ordering is guaranteed between the
//! operations of one entity, between a delete for an old path and the
//! install for its replacement, or between static chain teardown and writer
//! teardown.
//!
//! ## Outcome recording
//!
//! Under the default [`RecordPolicy::LastWriteWins`], each completion for an
//! entity overwrites that entity's table entry individually, so the final
//! entry of a multi-rule entity is the race winner among its completions.
//! This mirrors the behavior the engine historically had.
//! [`RecordPolicy::AllMustSucceed`] instead joins all operations of one
//! dispatch and records a single aggregate outcome, successful only if every
//! rule operation succeeded.
//!
//! Failures are recorded, never retried and never raised back to the
//! notification source; callers discover them through the query API
//! ([`FlowConnectionManager::get_failed_connection`] and friends).

use crate::patterns::{
    BridgePattern, BroadcastPattern, ChainPattern, PathPattern, PatternSelector,
    PositionalSelector, RuleMap,
};
use crate::programmer::{ProgramError, RuleProgrammer};
use crate::reactive::{AddressLearningWriter, ReactiveListener};
use crate::topology::{BroadcastDomain, NetworkPath, ServiceChain};
use crate::types::{ChainId, ElementId, FlowRule};
use crate::Error;

use futures::future::join_all;
use itertools::Itertools;
use log::*;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

mod store;
pub use store::OutcomeTable;

/// How the outcome of a multi-rule dispatch is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPolicy {
    /// One table write per rule completion; the entity's entry reflects
    /// whichever completion lands last. This is the historical behavior and
    /// the default.
    LastWriteWins,
    /// All rule operations of a dispatch are joined and recorded as a single
    /// aggregate outcome, successful only if every operation succeeded.
    AllMustSucceed,
}

impl Default for RecordPolicy {
    fn default() -> Self {
        Self::LastWriteWins
    }
}

/// Direction of a rule operation towards the programmer.
#[derive(Debug, Clone, Copy)]
enum FlowOp {
    Install,
    Remove,
}

/// What a completion does to the outcome table.
#[derive(Debug, Clone, Copy)]
enum Disposition {
    /// Success and failure are both recorded under the entity.
    Record,
    /// Success removes the entity's success entry. A failure is either
    /// recorded (chain deletion) or dropped (broadcast deletion).
    ForgetOnSuccess { record_failure: bool },
}

/// The reconciliation core ("flow connection manager").
///
/// Wiring happens through `&mut self`: register the patterns (append-only,
/// no replacement or removal) and optionally adjust the [`RecordPolicy`].
/// Afterwards the manager is driven entirely through `&self` event handlers
/// and can be shared across threads.
pub struct FlowConnectionManager {
    path_patterns: Vec<Arc<dyn PathPattern>>,
    broadcast_patterns: Vec<Arc<dyn BroadcastPattern>>,
    chain_patterns: Vec<Arc<dyn ChainPattern>>,
    bridge_patterns: Vec<Arc<dyn BridgePattern>>,
    selector: Box<dyn PatternSelector>,
    programmer: Arc<dyn RuleProgrammer>,
    listener: Arc<dyn ReactiveListener>,
    policy: RecordPolicy,

    path_table: Arc<OutcomeTable<NetworkPath, Arc<dyn PathPattern>>>,
    broadcast_table: Arc<OutcomeTable<BroadcastDomain, Arc<dyn BroadcastPattern>>>,
    chain_table: Arc<OutcomeTable<ServiceChain, Arc<dyn ChainPattern>>>,
    bridge_table: Arc<OutcomeTable<ElementId, Arc<dyn BridgePattern>>>,

    writers: Mutex<HashMap<ChainId, Arc<AddressLearningWriter>>>,
    inflight: Mutex<Vec<JoinHandle<()>>>,
}

impl fmt::Debug for FlowConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowConnectionManager")
            .field("path_patterns", &self.path_patterns.len())
            .field("broadcast_patterns", &self.broadcast_patterns.len())
            .field("chain_patterns", &self.chain_patterns.len())
            .field("bridge_patterns", &self.bridge_patterns.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl FlowConnectionManager {
    /// Create a manager with the default [`PositionalSelector`] and
    /// [`RecordPolicy::LastWriteWins`].
    pub fn new(programmer: Arc<dyn RuleProgrammer>, listener: Arc<dyn ReactiveListener>) -> Self {
        Self::with_selector(programmer, listener, Box::new(PositionalSelector))
    }

    /// Create a manager with a custom pattern selection policy.
    pub fn with_selector(
        programmer: Arc<dyn RuleProgrammer>,
        listener: Arc<dyn ReactiveListener>,
        selector: Box<dyn PatternSelector>,
    ) -> Self {
        Self {
            path_patterns: Vec::new(),
            broadcast_patterns: Vec::new(),
            chain_patterns: Vec::new(),
            bridge_patterns: Vec::new(),
            selector,
            programmer,
            listener,
            policy: RecordPolicy::default(),
            path_table: Arc::new(OutcomeTable::new()),
            broadcast_table: Arc::new(OutcomeTable::new()),
            chain_table: Arc::new(OutcomeTable::new()),
            bridge_table: Arc::new(OutcomeTable::new()),
            writers: Mutex::new(HashMap::new()),
            inflight: Mutex::new(Vec::new()),
        }
    }

    /// Change how multi-rule outcomes are recorded.
    pub fn set_record_policy(&mut self, policy: RecordPolicy) {
        self.policy = policy;
    }

    /// Register a path pattern (append-only).
    pub fn register_path_pattern(&mut self, pattern: Arc<dyn PathPattern>) {
        self.path_patterns.push(pattern);
    }

    /// Register a broadcast pattern (append-only).
    pub fn register_broadcast_pattern(&mut self, pattern: Arc<dyn BroadcastPattern>) {
        self.broadcast_patterns.push(pattern);
    }

    /// Register a chain pattern (append-only). At least
    /// [`MIN_CHAIN_PATTERNS`](crate::patterns::MIN_CHAIN_PATTERNS) chain
    /// patterns must be registered before chain events arrive.
    pub fn register_chain_pattern(&mut self, pattern: Arc<dyn ChainPattern>) {
        self.chain_patterns.push(pattern);
    }

    /// Register a bridge pattern (append-only).
    pub fn register_bridge_pattern(&mut self, pattern: Arc<dyn BridgePattern>) {
        self.bridge_patterns.push(pattern);
    }

    // ------------------------------------------------------------------
    // query API
    // ------------------------------------------------------------------

    /// The pattern behind the most recent successful rule operation for
    /// `path`, if any.
    pub fn get_successful_connection(&self, path: &NetworkPath) -> Option<Arc<dyn PathPattern>> {
        self.path_table.get_success(path)
    }

    /// The pattern behind the most recent failed rule operation for `path`,
    /// if any.
    pub fn get_failed_connection(&self, path: &NetworkPath) -> Option<Arc<dyn PathPattern>> {
        self.path_table.get_failure(path)
    }

    /// The pattern behind the most recent successful rule operation for
    /// `chain`, if any.
    pub fn get_successful_chain_connection(
        &self,
        chain: &ServiceChain,
    ) -> Option<Arc<dyn ChainPattern>> {
        self.chain_table.get_success(chain)
    }

    /// The pattern behind the most recent failed rule operation for `chain`,
    /// if any.
    pub fn get_failed_chain_connection(
        &self,
        chain: &ServiceChain,
    ) -> Option<Arc<dyn ChainPattern>> {
        self.chain_table.get_failure(chain)
    }

    // ------------------------------------------------------------------
    // path events
    // ------------------------------------------------------------------

    /// A path appeared: compile and install its rules.
    pub fn path_created(&self, path: NetworkPath) -> Result<(), Error> {
        let pattern = self.selector.select_path(&self.path_patterns, &path)?;
        debug!("Programming flows for created path {:?}", path);
        let rules = flatten(pattern.apply(&path));
        self.program_rules(
            FlowOp::Install,
            Disposition::Record,
            &self.path_table,
            path,
            pattern,
            rules,
        );
        Ok(())
    }

    /// A path was replaced: remove the rules of the old path and install the
    /// rules of the new one. The two dispatches are not sequenced against
    /// each other, and each records under its own path object.
    pub fn path_updated(&self, old: NetworkPath, new: NetworkPath) -> Result<(), Error> {
        let pattern = self.selector.select_path(&self.path_patterns, &new)?;
        debug!("Reprogramming flows for updated path {:?} -> {:?}", old, new);
        let old_rules = flatten(pattern.apply(&old));
        self.program_rules(
            FlowOp::Remove,
            Disposition::Record,
            &self.path_table,
            old,
            pattern.clone(),
            old_rules,
        );
        let new_rules = flatten(pattern.apply(&new));
        self.program_rules(
            FlowOp::Install,
            Disposition::Record,
            &self.path_table,
            new,
            pattern,
            new_rules,
        );
        Ok(())
    }

    /// A path disappeared: remove its rules, recording outcomes under the
    /// deleted path.
    pub fn path_deleted(&self, path: NetworkPath) -> Result<(), Error> {
        let pattern = self.selector.select_path(&self.path_patterns, &path)?;
        debug!("Removing flows for deleted path {:?}", path);
        let rules = flatten(pattern.apply(&path));
        self.program_rules(
            FlowOp::Remove,
            Disposition::Record,
            &self.path_table,
            path,
            pattern,
            rules,
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // broadcast events
    // ------------------------------------------------------------------

    /// A broadcast domain appeared: compile and install its rules, keyed by
    /// the whole path set.
    pub fn broadcast_created(&self, domain: BroadcastDomain) -> Result<(), Error> {
        let pattern = self.selector.select_broadcast(&self.broadcast_patterns, &domain)?;
        debug!("Programming broadcast flows for a domain of {} paths", domain.len());
        let rules = flatten(pattern.apply(&domain));
        self.program_rules(
            FlowOp::Install,
            Disposition::Record,
            &self.broadcast_table,
            domain,
            pattern,
            rules,
        );
        Ok(())
    }

    /// A broadcast domain disappeared: run the invalidation scan.
    ///
    /// Broadcast rule sets can be chained (one domain's output port feeds
    /// another's input), so removing a domain must also invalidate the
    /// domains topologically downstream of it instead of leaving orphaned
    /// rules. A recorded domain is downstream if it was programmed by the
    /// same pattern instance and any path of the deleted domain ends at a
    /// port where one of its paths begins. For every invalidated domain the
    /// rules are removed; a successful removal drops the success entry,
    /// while a failed removal leaves it in place and is not recorded.
    pub fn broadcast_deleted(&self, domain: BroadcastDomain) -> Result<(), Error> {
        let pattern = self.selector.select_broadcast(&self.broadcast_patterns, &domain)?;

        let mut queued: Vec<BroadcastDomain> = Vec::new();
        for (recorded, recorded_pattern) in self.broadcast_table.snapshot_success() {
            if !Arc::ptr_eq(&recorded_pattern, &pattern) {
                continue;
            }
            let adjacent = domain
                .iter()
                .cartesian_product(recorded.iter())
                .any(|(new_path, old_path)| old_path.begin_port() == new_path.end_port());
            if adjacent {
                queued.push(recorded);
            }
        }

        debug!(
            "Broadcast domain deleted, invalidating {} downstream domain(s)",
            queued.len()
        );

        for invalidated in queued {
            let rules = flatten(pattern.apply(&invalidated));
            self.program_rules(
                FlowOp::Remove,
                Disposition::ForgetOnSuccess { record_failure: false },
                &self.broadcast_table,
                invalidated,
                pattern.clone(),
                rules,
            );
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // service chain events
    // ------------------------------------------------------------------

    /// A service chain appeared: install the static rules of every traversal
    /// segment and start the address-learning writer for the chain.
    ///
    /// All segments record under the same chain and pattern, so under the
    /// default policy a later segment's completion overwrites an earlier
    /// segment's recorded outcome.
    pub fn chain_created(&self, chain: ServiceChain) -> Result<(), Error> {
        let pattern = self.selector.select_chain(&self.chain_patterns, &chain)?;
        info!("Programming flows for created service chain {:?}", chain.id());

        for segment in pattern.apply(&chain) {
            self.program_rules(
                FlowOp::Install,
                Disposition::Record,
                &self.chain_table,
                chain.clone(),
                pattern.clone(),
                flatten(segment),
            );
        }

        let writer = Arc::new(AddressLearningWriter::from_chain(&chain, self.programmer.clone())?);
        self.listener.register_address_listener(writer.clone());
        if let Some(old) = self.writers.lock().unwrap().insert(chain.id(), writer) {
            warn!("Replaced a live address-learning writer for chain {:?}", old.chain_id());
        }
        Ok(())
    }

    /// A service chain disappeared: remove the static rules of every segment
    /// and tear down the chain's address-learning writer.
    ///
    /// A successful rule removal drops the chain's success entry; a failed
    /// removal is recorded in the failure table. The writer teardown is
    /// unconditional and does not wait for the rule completions: the chain
    /// must stop reacting to learned addresses even if its static rules
    /// could not be removed.
    pub fn chain_deleted(&self, chain: ServiceChain) -> Result<(), Error> {
        let pattern = self.selector.select_chain(&self.chain_patterns, &chain)?;
        info!("Removing flows for deleted service chain {:?}", chain.id());

        for segment in pattern.apply(&chain) {
            self.program_rules(
                FlowOp::Remove,
                Disposition::ForgetOnSuccess { record_failure: true },
                &self.chain_table,
                chain.clone(),
                pattern.clone(),
                flatten(segment),
            );
        }

        let writer = self.writers.lock().unwrap().remove(&chain.id());
        if let Some(writer) = writer {
            writer.shut_down();
            self.listener.unregister_address_listener(&writer);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // forwarding element events
    // ------------------------------------------------------------------

    /// A forwarding element appeared: install its bridge rules.
    pub fn bridge_created(&self, element: ElementId) -> Result<(), Error> {
        let pattern = self.selector.select_bridge(&self.bridge_patterns, element)?;
        debug!("Programming bridge flows for element {:?}", element);
        let rules: Vec<(ElementId, FlowRule)> =
            pattern.apply(element).into_iter().map(|rule| (element, rule)).collect();
        self.program_rules(
            FlowOp::Install,
            Disposition::Record,
            &self.bridge_table,
            element,
            pattern,
            rules,
        );
        Ok(())
    }

    /// A forwarding element changed. Recognized but unhandled: bridge rule
    /// reprogramming is not implemented.
    pub fn bridge_updated(&self, old: ElementId, new: ElementId) {
        debug!("Ignoring bridge update {:?} -> {:?}: bridge teardown not implemented", old, new);
    }

    /// A forwarding element disappeared. Recognized but unhandled: bridge
    /// rule removal is not implemented.
    pub fn bridge_deleted(&self, element: ElementId) {
        debug!("Ignoring bridge deletion {:?}: bridge teardown not implemented", element);
    }

    // ------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------

    /// Submit one dispatch of rule operations and arrange for its outcomes
    /// to be recorded in `table` under `key`.
    fn program_rules<K, P>(
        &self,
        op: FlowOp,
        disposition: Disposition,
        table: &Arc<OutcomeTable<K, P>>,
        key: K,
        pattern: P,
        rules: Vec<(ElementId, FlowRule)>,
    ) where
        K: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static,
        P: Clone + Send + Sync + 'static,
    {
        // a pattern may yield no rules; both policies then record nothing
        if rules.is_empty() {
            return;
        }
        match self.policy {
            RecordPolicy::LastWriteWins => {
                for (element, rule) in rules {
                    let programmer = self.programmer.clone();
                    let table = table.clone();
                    let key = key.clone();
                    let pattern = pattern.clone();
                    let handle = tokio::spawn(async move {
                        let res = match op {
                            FlowOp::Install => programmer.install(rule, element).await,
                            FlowOp::Remove => programmer.remove(rule, element).await,
                        };
                        apply_outcome(&table, key, pattern, disposition, res);
                    });
                    self.inflight.lock().unwrap().push(handle);
                }
            }
            RecordPolicy::AllMustSucceed => {
                let programmer = self.programmer.clone();
                let table = table.clone();
                let handle = tokio::spawn(async move {
                    let ops = rules.into_iter().map(|(element, rule)| {
                        let programmer = programmer.clone();
                        async move {
                            match op {
                                FlowOp::Install => programmer.install(rule, element).await,
                                FlowOp::Remove => programmer.remove(rule, element).await,
                            }
                        }
                    });
                    let aggregate = join_all(ops)
                        .await
                        .into_iter()
                        .find(|res| res.is_err())
                        .unwrap_or(Ok(()));
                    apply_outcome(&table, key, pattern, disposition, aggregate);
                });
                self.inflight.lock().unwrap().push(handle);
            }
        }
    }

    /// Await all rule operations submitted so far. Used by tests and for an
    /// orderly shutdown; event handlers never call this.
    pub async fn quiesce(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> =
                self.inflight.lock().unwrap().drain(..).collect();
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    warn!("Rule operation task did not complete: {}", e);
                }
            }
        }
    }
}

/// Record the completion of one rule operation (or of an aggregated
/// dispatch) in the outcome table.
fn apply_outcome<K, P>(
    table: &OutcomeTable<K, P>,
    key: K,
    pattern: P,
    disposition: Disposition,
    res: Result<(), ProgramError>,
) where
    K: Clone + Eq + Hash + fmt::Debug,
    P: Clone,
{
    match (disposition, res) {
        (Disposition::Record, Ok(())) => table.record_success(key, pattern),
        (Disposition::Record, Err(e)) => {
            warn!("Rule operation for {:?} failed: {}", key, e);
            table.record_failure(key, pattern);
        }
        (Disposition::ForgetOnSuccess { .. }, Ok(())) => {
            table.forget_success(&key);
        }
        (Disposition::ForgetOnSuccess { record_failure }, Err(e)) => {
            warn!("Rule removal for {:?} failed: {}", key, e);
            if record_failure {
                table.record_failure(key, pattern);
            }
        }
    }
}

/// Flatten a per-element rule mapping into independent (element, rule)
/// operations.
fn flatten(map: RuleMap) -> Vec<(ElementId, FlowRule)> {
    map.into_iter()
        .flat_map(|(element, rules)| rules.into_iter().map(move |rule| (element, rule)))
        .collect()
}
