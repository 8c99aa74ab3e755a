/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

mod common;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use entity::member::OrgRole;
use entity::sub_task;
use entity::task::TaskStatus;
use sea_orm::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;
use web::endpoints::subtasks::{self, MakeSubTaskRequest, PatchSubTaskRequest};

fn make_sub_task(task: Uuid, title: &str, done: bool, order_index: i32) -> sub_task::Model {
    sub_task::Model {
        id: Uuid::new_v4(),
        task,
        title: title.to_owned(),
        done,
        done_at: done.then(common::naive_date),
        order_index,
        created_at: common::naive_date(),
    }
}

fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(count)))])
}

#[test]
fn test_new_sub_task_is_placed_before_done_items() {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async {
            let org = common::make_organization("acmeincsluga");
            let caller = common::make_user("owner@example.com");
            let project = common::make_project(org.id);
            let task = common::make_task(project.id, TaskStatus::InProgress);

            let done = make_sub_task(task.id, "Ship it", true, 0);
            let created = make_sub_task(task.id, "Write the failing test", false, 1);

            let mut done_after = done.clone();
            done_after.order_index = 1;
            let mut created_after = created.clone();
            created_after.order_index = 0;

            let db = common::project_scope_mock(&org, &caller, &project, OrgRole::Owner)
                .append_query_results([vec![task.clone()]])
                .append_query_results([vec![count_row(1)]])
                .append_query_results([vec![created.clone()]])
                .append_query_results([vec![done.clone(), created.clone()]])
                .append_query_results([vec![done_after.clone()]])
                .append_query_results([vec![created_after.clone()]])
                .append_query_results([vec![created_after.clone()]])
                .into_connection();
            let state = common::create_state_with_db(db);

            let (status, Json(sub_task)) = subtasks::post(
                State(Arc::clone(&state)),
                Extension(caller),
                Path((org.slug.clone(), project.slug.clone(), task.slug.clone())),
                Json(MakeSubTaskRequest {
                    title: "Write the failing test".to_string(),
                }),
            )
            .await
            .expect("create failed");

            assert_eq!(status, StatusCode::CREATED);
            assert!(!sub_task.done);
            assert_eq!(sub_task.order_index, 0);

            // Both rows were re-indexed inside the transaction.
            let log = common::transaction_log(state);
            assert_eq!(log.matches(r#"UPDATE "sub_task""#).count(), 2);
        })
}

#[test]
fn test_toggled_sub_task_response_carries_final_index() {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async {
            let org = common::make_organization("acmeincslugb");
            let caller = common::make_user("owner@example.com");
            let project = common::make_project(org.id);
            let task = common::make_task(project.id, TaskStatus::InProgress);

            let target = make_sub_task(task.id, "Write the failing test", false, 0);
            let other = make_sub_task(task.id, "Fix the bug", false, 1);

            let mut target_done = target.clone();
            target_done.done = true;
            target_done.done_at = Some(common::naive_date());

            let mut target_final = target_done.clone();
            target_final.order_index = 1;
            let mut other_final = other.clone();
            other_final.order_index = 0;

            let db = common::project_scope_mock(&org, &caller, &project, OrgRole::Owner)
                .append_query_results([vec![task.clone()]])
                .append_query_results([vec![target.clone()]])
                .append_query_results([vec![target_done.clone()]])
                .append_query_results([vec![target_done.clone(), other.clone()]])
                .append_query_results([vec![target_final.clone()]])
                .append_query_results([vec![other_final.clone()]])
                .append_query_results([vec![target_final.clone()]])
                .into_connection();
            let state = common::create_state_with_db(db);

            let Json(sub_task) = subtasks::patch_sub_task(
                State(Arc::clone(&state)),
                Extension(caller),
                Path((
                    org.slug.clone(),
                    project.slug.clone(),
                    task.slug.clone(),
                    target.id,
                )),
                Json(PatchSubTaskRequest {
                    title: None,
                    done: Some(true),
                }),
            )
            .await
            .expect("patch failed");

            // The done item moved behind the open one; the response reflects the
            // re-partitioned index, not the pre-partition row.
            assert!(sub_task.done);
            assert_eq!(sub_task.order_index, 1);
        })
}
