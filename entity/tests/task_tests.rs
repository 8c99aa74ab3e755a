/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for task and sub-task entities

use chrono::NaiveDate;
use entity::*;
use sea_orm::{DatabaseBackend, MockDatabase, entity::prelude::*};
use uuid::Uuid;

fn naive_date() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn make_task(project: Uuid, slug: &str, status: task::TaskStatus) -> task::Model {
    task::Model {
        id: Uuid::new_v4(),
        project,
        slug: slug.to_owned(),
        title: "Fix the flaky pipeline".to_owned(),
        description: String::new(),
        assigned_to: None,
        status,
        priority: task::Priority::Medium,
        task_type: task::TaskType::Bug,
        deadline: None,
        completed_at: None,
        archived: false,
        archived_at: None,
        created_by: Some(Uuid::new_v4()),
        updated_by: Uuid::new_v4(),
        created_at: naive_date(),
        updated_at: naive_date(),
    }
}

#[tokio::test]
async fn test_task_entity_basic() -> Result<(), DbErr> {
    let project_id = Uuid::new_v4();
    let task = make_task(project_id, "a1b2c3d4", task::TaskStatus::InProgress);
    let task_id = task.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![task]])
        .into_connection();

    let result = task::Entity::find_by_id(task_id).one(&db).await?;

    assert!(result.is_some());
    let task = result.unwrap();
    assert_eq!(task.slug, "a1b2c3d4");
    assert_eq!(task.status, task::TaskStatus::InProgress);
    assert_eq!(task.task_type, task::TaskType::Bug);
    assert!(!task.archived);

    Ok(())
}

#[tokio::test]
async fn test_task_outlives_creator_account() -> Result<(), DbErr> {
    // created_by is cleared when the creator's account is removed; the
    // task row itself stays.
    let mut task = make_task(Uuid::new_v4(), "e5f6a7b8", task::TaskStatus::Todo);
    task.created_by = None;
    let task_id = task.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![task]])
        .into_connection();

    let result = task::Entity::find_by_id(task_id).one(&db).await?;

    assert!(result.is_some());
    assert!(result.unwrap().created_by.is_none());

    Ok(())
}

#[tokio::test]
async fn test_sub_task_ordering_fields() -> Result<(), DbErr> {
    let task_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            sub_task::Model {
                id: Uuid::new_v4(),
                task: task_id,
                title: "Write the failing test".to_owned(),
                done: false,
                done_at: None,
                order_index: 0,
                created_at: naive_date(),
            },
            sub_task::Model {
                id: Uuid::new_v4(),
                task: task_id,
                title: "Fix the bug".to_owned(),
                done: true,
                done_at: Some(naive_date()),
                order_index: 1,
                created_at: naive_date(),
            },
        ]])
        .into_connection();

    let sub_tasks = sub_task::Entity::find().all(&db).await?;

    assert_eq!(sub_tasks.len(), 2);
    assert_eq!(sub_tasks[0].order_index, 0);
    assert!(sub_tasks[1].done);
    assert!(sub_tasks[1].done_at.is_some());

    Ok(())
}
