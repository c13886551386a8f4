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

use super::fixtures::path;
use crate::topology::{NetworkPath, ServiceChain, TopologyError};
use crate::types::{ChainId, ElementId, PortId};

#[test]
fn test_empty_path() {
    assert_eq!(NetworkPath::new(vec![]), Err(TopologyError::EmptyPath));
}

#[test]
fn test_path_endpoints() {
    let p = path(&[(1, 10, 11), (2, 12, 13), (3, 14, 15)]);
    assert_eq!(p.begin_element(), ElementId(1));
    assert_eq!(p.end_element(), ElementId(3));
    assert_eq!(p.begin_port(), PortId(10));
    assert_eq!(p.end_port(), PortId(15));
    assert!(!p.is_degenerate());
}

#[test]
fn test_path_links() {
    let p = path(&[(1, 10, 11), (2, 12, 13), (3, 14, 15)]);
    assert_eq!(p.next_link(ElementId(1)), Some(PortId(11)));
    assert_eq!(p.next_link(ElementId(2)), Some(PortId(13)));
    assert_eq!(p.previous_link(ElementId(2)), Some(PortId(12)));
    assert_eq!(p.previous_link(ElementId(3)), Some(PortId(14)));
    assert_eq!(p.next_link(ElementId(99)), None);
    assert_eq!(p.previous_link(ElementId(99)), None);
}

#[test]
fn test_degenerate_path() {
    let p = path(&[(7, 20, 21)]);
    assert!(p.is_degenerate());
    assert_eq!(p.begin_element(), p.end_element());
    assert_eq!(p.begin_port(), PortId(20));
    assert_eq!(p.end_port(), PortId(21));
}

#[test]
fn test_path_value_equality() {
    // a rebuilt path with equal hops must match earlier records
    let a = path(&[(1, 10, 11), (2, 12, 13)]);
    let b = path(&[(1, 10, 11), (2, 12, 13)]);
    assert_eq!(a, b);
    assert_ne!(a, path(&[(1, 10, 11), (2, 12, 14)]));
}

#[test]
fn test_chain_too_short() {
    assert_eq!(
        ServiceChain::new(ChainId(1), vec![path(&[(1, 10, 11)])], 1),
        Err(TopologyError::ChainTooShort { paths: 1 })
    );
    assert_eq!(
        ServiceChain::new(ChainId(1), vec![], 0),
        Err(TopologyError::ChainTooShort { paths: 0 })
    );
}

#[test]
fn test_chain_accessors() {
    let first = path(&[(1, 10, 11), (2, 12, 13)]);
    let last = path(&[(3, 20, 21)]);
    let sc = ServiceChain::new(ChainId(9), vec![first.clone(), last.clone()], 3).unwrap();
    assert_eq!(sc.id(), ChainId(9));
    assert_eq!(sc.begin(), &first);
    assert_eq!(sc.end(), &last);
    assert_eq!(sc.num_hops(), 3);
    assert_eq!(sc.paths().len(), 2);
}
