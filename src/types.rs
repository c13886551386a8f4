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

//! Module containing all type definitions

/// Forwarding element identification (a switch or bridge in the data plane)
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct ElementId(pub u32);

/// Port identification (an attachment point on a forwarding element)
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct PortId(pub u64);

/// Service chain identification (small integer, used as a registry key)
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct ChainId(pub u32);

/// A single flow rule (match + actions + table placement).
///
/// The engine treats rules as opaque: it never interprets the match or the
/// actions, it only forwards the rule to the
/// [`RuleProgrammer`](crate::programmer::RuleProgrammer) together with the
/// forwarding element that must carry it.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone)]
pub struct FlowRule {
    /// Flow table the rule is placed in
    pub table: u8,
    /// Rule priority within the table
    pub priority: u16,
    /// Opaque match expression
    pub matches: String,
    /// Opaque action list
    pub actions: Vec<String>,
}

impl FlowRule {
    /// Create a new flow rule.
    pub fn new(table: u8, priority: u16, matches: &str, actions: Vec<String>) -> Self {
        Self { table, priority, matches: matches.to_string(), actions }
    }
}
