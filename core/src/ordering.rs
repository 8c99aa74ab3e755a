/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Sub-task order maintenance: a stable partition that keeps unfinished
//! items first and reassigns indexes densely.

use uuid::Uuid;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OrderedItem {
    pub id: Uuid,
    pub done: bool,
    pub order_index: i32,
}

/// Returns the dense 0..N-1 assignment for the given sub-tasks: not-done
/// items before done items, original order preserved within each group.
pub fn partition_order(items: &[OrderedItem]) -> Vec<(Uuid, i32)> {
    let mut sorted: Vec<&OrderedItem> = items.iter().collect();
    sorted.sort_by_key(|i| (i.done, i.order_index));

    sorted
        .iter()
        .enumerate()
        .map(|(index, item)| (item.id, index as i32))
        .collect()
}

/// Applies a caller-provided ordering, then the partition rule. The
/// requested ids must be exactly the current set.
pub fn apply_explicit_order(
    items: &[OrderedItem],
    requested: &[Uuid],
) -> Result<Vec<(Uuid, i32)>, String> {
    if requested.len() != items.len() {
        return Err("Order must list every sub-task exactly once".to_string());
    }

    let mut reordered = Vec::with_capacity(items.len());

    for (position, id) in requested.iter().enumerate() {
        let item = items
            .iter()
            .find(|i| i.id == *id)
            .ok_or_else(|| format!("Unknown sub-task in order: {}", id))?;

        if reordered.iter().any(|i: &OrderedItem| i.id == *id) {
            return Err(format!("Duplicate sub-task in order: {}", id));
        }

        reordered.push(OrderedItem {
            id: item.id,
            done: item.done,
            order_index: position as i32,
        });
    }

    Ok(partition_order(&reordered))
}
