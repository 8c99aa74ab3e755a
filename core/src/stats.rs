/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Task aggregation for project dashboards. Single linear pass, no
//! sorting.

use chrono::NaiveDateTime;
use entity::task::{Priority, TaskStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::MTask;

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub todo: u64,
    pub in_progress: u64,
    pub review: u64,
    pub blocked: u64,
    pub done: u64,
    pub canceled: u64,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct PriorityCounts {
    pub none: u64,
    pub low: u64,
    pub medium: u64,
    pub high: u64,
    pub urgent: u64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct TaskStats {
    pub total: u64,
    pub status: StatusCounts,
    pub priority: PriorityCounts,
    /// Completed share in whole percent, 0 for an empty task list.
    pub progress: u64,
    /// First task in stored order whose deadline is strictly in the future.
    pub next_due: Option<Uuid>,
    /// Tasks with a past deadline that are not done yet.
    pub overdue: u64,
}

pub fn compute(tasks: &[MTask], now: NaiveDateTime) -> TaskStats {
    let mut status = StatusCounts::default();
    let mut priority = PriorityCounts::default();
    let mut next_due = None;
    let mut overdue = 0;

    for task in tasks {
        match task.status {
            TaskStatus::Todo => status.todo += 1,
            TaskStatus::InProgress => status.in_progress += 1,
            TaskStatus::Review => status.review += 1,
            TaskStatus::Blocked => status.blocked += 1,
            TaskStatus::Done => status.done += 1,
            TaskStatus::Canceled => status.canceled += 1,
        }

        match task.priority {
            Priority::None => priority.none += 1,
            Priority::Low => priority.low += 1,
            Priority::Medium => priority.medium += 1,
            Priority::High => priority.high += 1,
            Priority::Urgent => priority.urgent += 1,
        }

        if let Some(deadline) = task.deadline {
            if deadline > now && next_due.is_none() {
                next_due = Some(task.id);
            }

            if deadline < now && task.status != TaskStatus::Done {
                overdue += 1;
            }
        }
    }

    let total = tasks.len() as u64;
    let progress = if total == 0 {
        0
    } else {
        (status.done as f64 / total as f64 * 100.0).round() as u64
    };

    TaskStats {
        total,
        status,
        priority,
        progress,
        next_due,
        overdue,
    }
}
