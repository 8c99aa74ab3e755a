/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for the sub-task order invariants

extern crate core as trellis_core;
use trellis_core::ordering::*;
use uuid::Uuid;

fn item(done: bool, order_index: i32) -> OrderedItem {
    OrderedItem {
        id: Uuid::new_v4(),
        done,
        order_index,
    }
}

fn assert_dense(assignment: &[(Uuid, i32)]) {
    let mut indexes: Vec<i32> = assignment.iter().map(|(_, i)| *i).collect();
    indexes.sort();
    let expected: Vec<i32> = (0..assignment.len() as i32).collect();
    assert_eq!(indexes, expected);
}

#[test]
fn test_partition_order_is_dense() {
    let items = vec![item(true, 3), item(false, 0), item(true, 7), item(false, 5)];
    let assignment = partition_order(&items);

    assert_eq!(assignment.len(), 4);
    assert_dense(&assignment);
}

#[test]
fn test_partition_order_puts_unfinished_first() {
    let open_a = item(false, 4);
    let done_a = item(true, 0);
    let open_b = item(false, 9);
    let items = vec![done_a, open_a, open_b];

    let assignment = partition_order(&items);

    let index_of = |id: Uuid| assignment.iter().find(|(i, _)| *i == id).unwrap().1;

    assert_eq!(index_of(open_a.id), 0);
    assert_eq!(index_of(open_b.id), 1);
    assert_eq!(index_of(done_a.id), 2);
}

#[test]
fn test_partition_order_is_stable_within_groups() {
    let items = vec![
        item(false, 0),
        item(false, 1),
        item(true, 2),
        item(true, 3),
    ];

    let assignment = partition_order(&items);

    for (position, original) in items.iter().enumerate() {
        let assigned = assignment.iter().find(|(id, _)| *id == original.id).unwrap().1;
        assert_eq!(assigned, position as i32);
    }
}

#[test]
fn test_partition_order_empty() {
    assert!(partition_order(&[]).is_empty());
}

#[test]
fn test_partition_order_moves_appended_item_into_open_block() {
    // A fresh item appended at the end of the list starts out behind any
    // done items and must not stay there.
    let done = item(true, 0);
    let appended = item(false, 1);
    let items = vec![done, appended];

    let assignment = partition_order(&items);
    let index_of = |id: Uuid| assignment.iter().find(|(i, _)| *i == id).unwrap().1;

    assert_eq!(index_of(appended.id), 0);
    assert_eq!(index_of(done.id), 1);
}

#[test]
fn test_apply_explicit_order_reorders_open_items() {
    let a = item(false, 0);
    let b = item(false, 1);
    let c = item(false, 2);
    let items = vec![a, b, c];

    let assignment = apply_explicit_order(&items, &[c.id, a.id, b.id]).unwrap();
    let index_of = |id: Uuid| assignment.iter().find(|(i, _)| *i == id).unwrap().1;

    assert_eq!(index_of(c.id), 0);
    assert_eq!(index_of(a.id), 1);
    assert_eq!(index_of(b.id), 2);
    assert_dense(&assignment);
}

#[test]
fn test_apply_explicit_order_keeps_done_items_last() {
    let open = item(false, 1);
    let done = item(true, 0);
    let items = vec![done, open];

    // Requesting the done item first still yields the partition order.
    let assignment = apply_explicit_order(&items, &[done.id, open.id]).unwrap();
    let index_of = |id: Uuid| assignment.iter().find(|(i, _)| *i == id).unwrap().1;

    assert_eq!(index_of(open.id), 0);
    assert_eq!(index_of(done.id), 1);
}

#[test]
fn test_apply_explicit_order_rejects_wrong_sets() {
    let a = item(false, 0);
    let b = item(false, 1);
    let items = vec![a, b];

    assert!(apply_explicit_order(&items, &[a.id]).is_err());
    assert!(apply_explicit_order(&items, &[a.id, a.id]).is_err());
    assert!(apply_explicit_order(&items, &[a.id, Uuid::new_v4()]).is_err());
}
