/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for the project dashboard aggregation

extern crate core as trellis_core;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use entity::task::{Priority, TaskStatus, TaskType};
use trellis_core::stats::compute;
use trellis_core::types::MTask;
use uuid::Uuid;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn task(status: TaskStatus, priority: Priority, deadline: Option<NaiveDateTime>) -> MTask {
    MTask {
        id: Uuid::new_v4(),
        project: Uuid::new_v4(),
        slug: "t".to_owned(),
        title: "task".to_owned(),
        description: String::new(),
        assigned_to: None,
        status,
        priority,
        task_type: TaskType::Task,
        deadline,
        completed_at: None,
        archived: false,
        archived_at: None,
        created_by: Some(Uuid::new_v4()),
        updated_by: Uuid::new_v4(),
        created_at: now(),
        updated_at: now(),
    }
}

#[test]
fn test_empty_task_list() {
    let stats = compute(&[], now());

    assert_eq!(stats.total, 0);
    assert_eq!(stats.progress, 0);
    assert_eq!(stats.overdue, 0);
    assert!(stats.next_due.is_none());
}

#[test]
fn test_status_and_priority_counts() {
    let tasks = vec![
        task(TaskStatus::Todo, Priority::Low, None),
        task(TaskStatus::Todo, Priority::High, None),
        task(TaskStatus::InProgress, Priority::Urgent, None),
        task(TaskStatus::Done, Priority::None, None),
    ];

    let stats = compute(&tasks, now());

    assert_eq!(stats.total, 4);
    assert_eq!(stats.status.todo, 2);
    assert_eq!(stats.status.in_progress, 1);
    assert_eq!(stats.status.done, 1);
    assert_eq!(stats.priority.low, 1);
    assert_eq!(stats.priority.high, 1);
    assert_eq!(stats.priority.urgent, 1);
    assert_eq!(stats.priority.none, 1);
}

#[test]
fn test_progress_is_rounded_percent() {
    let mut tasks = vec![
        task(TaskStatus::Done, Priority::None, None),
        task(TaskStatus::Done, Priority::None, None),
        task(TaskStatus::Done, Priority::None, None),
        task(TaskStatus::Todo, Priority::None, None),
        task(TaskStatus::Todo, Priority::None, None),
    ];

    // 3 of 5 done
    assert_eq!(compute(&tasks, now()).progress, 60);

    // 1 of 3 done rounds down to 33
    tasks.truncate(3);
    tasks[1].status = TaskStatus::Todo;
    tasks[2].status = TaskStatus::Todo;
    assert_eq!(compute(&tasks, now()).progress, 33);

    // 2 of 3 done rounds up to 67
    tasks[1].status = TaskStatus::Done;
    assert_eq!(compute(&tasks, now()).progress, 67);
}

#[test]
fn test_next_due_is_first_strictly_future_in_stored_order() {
    let past = task(TaskStatus::Todo, Priority::None, Some(now() - Duration::days(1)));
    let soon = task(TaskStatus::Todo, Priority::None, Some(now() + Duration::hours(2)));
    let later = task(TaskStatus::Todo, Priority::None, Some(now() + Duration::days(3)));

    // Stored order decides, not deadline proximity.
    let stats = compute(&[past.clone(), later.clone(), soon.clone()], now());
    assert_eq!(stats.next_due, Some(later.id));

    // A deadline exactly at "now" is not future.
    let at_now = task(TaskStatus::Todo, Priority::None, Some(now()));
    let stats = compute(&[at_now, soon.clone()], now());
    assert_eq!(stats.next_due, Some(soon.id));
}

#[test]
fn test_overdue_excludes_done_tasks() {
    let overdue_open = task(
        TaskStatus::InProgress,
        Priority::None,
        Some(now() - Duration::days(2)),
    );
    let overdue_done = task(
        TaskStatus::Done,
        Priority::None,
        Some(now() - Duration::days(2)),
    );
    let future = task(
        TaskStatus::Todo,
        Priority::None,
        Some(now() + Duration::days(2)),
    );

    let stats = compute(&[overdue_open, overdue_done, future], now());

    assert_eq!(stats.overdue, 1);
}
