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

use super::fixtures::{chain, path, MockProgrammer};
use crate::reactive::AddressLearningWriter;
use crate::types::{ChainId, ElementId, PortId};
use crate::Shutdown;

#[test]
fn test_writer_boundary_ports() {
    // begin path 1 -> 2, end path 3 -> 4, neither degenerate
    let sc = chain(
        7,
        vec![path(&[(1, 10, 11), (2, 12, 13)]), path(&[(3, 20, 21), (4, 22, 23)])],
        4,
    );
    let writer = AddressLearningWriter::from_chain(&sc, MockProgrammer::new()).unwrap();

    assert_eq!(writer.chain_id(), ChainId(7));
    assert_eq!(writer.begin_element(), ElementId(1));
    assert_eq!(writer.end_element(), ElementId(4));
    assert_eq!(writer.begin_port(), PortId(10));
    assert_eq!(writer.end_port(), PortId(23));
    // link port of the begin path relative to its begin element
    assert_eq!(writer.begin_bridge_end_port(), PortId(11));
    // link port of the end path relative to its end element
    assert_eq!(writer.end_bridge_begin_port(), PortId(22));
    // non-degenerate end path: stated hop count unchanged
    assert_eq!(writer.effective_hops(), 4);
}

#[test]
fn test_writer_degenerate_end_path() {
    let sc = chain(8, vec![path(&[(1, 10, 11), (2, 12, 13)]), path(&[(5, 30, 31)])], 3);
    let writer = AddressLearningWriter::from_chain(&sc, MockProgrammer::new()).unwrap();

    // degenerate end path: its begin port, and one hop less
    assert_eq!(writer.end_bridge_begin_port(), PortId(30));
    assert_eq!(writer.effective_hops(), 2);
    assert_eq!(writer.end_element(), ElementId(5));
    assert_eq!(writer.end_port(), PortId(31));
}

#[test]
fn test_writer_zero_hop_chain_with_degenerate_end() {
    // a stated hop count of 0 must not wrap through the adjustment
    let sc = chain(10, vec![path(&[(1, 10, 11), (2, 12, 13)]), path(&[(5, 30, 31)])], 0);
    let writer = AddressLearningWriter::from_chain(&sc, MockProgrammer::new()).unwrap();

    assert_eq!(writer.effective_hops(), 0);
    assert_eq!(writer.end_bridge_begin_port(), PortId(30));
}

#[test]
fn test_writer_degenerate_begin_path() {
    let sc = chain(9, vec![path(&[(6, 40, 41)]), path(&[(3, 20, 21), (4, 22, 23)])], 3);
    let writer = AddressLearningWriter::from_chain(&sc, MockProgrammer::new()).unwrap();

    // degenerate begin path: its end port is the bridge boundary
    assert_eq!(writer.begin_bridge_end_port(), PortId(41));
    assert_eq!(writer.begin_port(), PortId(40));
    assert_eq!(writer.effective_hops(), 3);
}

#[test]
fn test_writer_shutdown_is_idempotent() {
    let sc = chain(1, vec![path(&[(1, 10, 11)]), path(&[(2, 20, 21)])], 2);
    let writer = AddressLearningWriter::from_chain(&sc, MockProgrammer::new()).unwrap();

    assert!(!writer.is_shut_down());
    writer.shut_down();
    assert!(writer.is_shut_down());
    writer.shut_down();
    writer.shut_down();
    assert!(writer.is_shut_down());
}

#[test]
fn test_shutdown_trigger_reports_first_call() {
    let s = Shutdown::new();
    assert!(!s.is_shutdown());
    assert!(s.trigger());
    assert!(!s.trigger());
    assert!(s.is_shutdown());

    // clones share the flag
    let s2 = s.clone();
    assert!(s2.is_shutdown());
}
