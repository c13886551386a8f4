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

//! Concurrency-safe per-entity outcome store

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

/// Records, per topology entity, the pattern behind the most recent
/// successful and the most recent failed rule operation.
///
/// Success and failure are independent maps: recording one outcome for an
/// entity overwrites only the map it lands in and never clears the other.
/// Completion callbacks of different in-flight rule operations mutate the
/// table concurrently, so every operation is an atomic read-modify-write
/// behind a lock.
#[derive(Debug)]
pub struct OutcomeTable<K, P> {
    success: Mutex<HashMap<K, P>>,
    failure: Mutex<HashMap<K, P>>,
}

impl<K, P> Default for OutcomeTable<K, P> {
    fn default() -> Self {
        Self { success: Mutex::new(HashMap::new()), failure: Mutex::new(HashMap::new()) }
    }
}

impl<K, P> OutcomeTable<K, P>
where
    K: Clone + Eq + Hash,
    P: Clone,
{
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `pattern` as the most recent successful outcome for `key`.
    pub fn record_success(&self, key: K, pattern: P) {
        self.success.lock().unwrap().insert(key, pattern);
    }

    /// Record `pattern` as the most recent failed outcome for `key`.
    pub fn record_failure(&self, key: K, pattern: P) {
        self.failure.lock().unwrap().insert(key, pattern);
    }

    /// Drop the success entry for `key`, returning whether one existed.
    pub fn forget_success(&self, key: &K) -> bool {
        self.success.lock().unwrap().remove(key).is_some()
    }

    /// The currently recorded successful pattern for `key`.
    pub fn get_success(&self, key: &K) -> Option<P> {
        self.success.lock().unwrap().get(key).cloned()
    }

    /// The currently recorded failed pattern for `key`.
    pub fn get_failure(&self, key: &K) -> Option<P> {
        self.failure.lock().unwrap().get(key).cloned()
    }

    /// A snapshot of all success entries, for scans over recorded state.
    pub fn snapshot_success(&self) -> Vec<(K, P)> {
        self.success.lock().unwrap().iter().map(|(k, p)| (k.clone(), p.clone())).collect()
    }
}
