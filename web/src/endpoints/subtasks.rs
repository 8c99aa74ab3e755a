/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use core::ordering::{OrderedItem, apply_explicit_order, partition_order};
use core::policy::{ProjectAction, project_allows};
use core::types::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::tasks::{get_scope, get_task_in_project};

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeSubTaskRequest {
    pub title: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PatchSubTaskRequest {
    pub title: Option<String>,
    pub done: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct OrderSubTasksRequest {
    pub order: Vec<Uuid>,
}

fn as_ordered_items(models: &[MSubTask]) -> Vec<OrderedItem> {
    models
        .iter()
        .map(|s| OrderedItem {
            id: s.id,
            done: s.done,
            order_index: s.order_index,
        })
        .collect()
}

async fn load_sub_tasks<C: ConnectionTrait>(db: &C, task_id: Uuid) -> Result<Vec<MSubTask>, sea_orm::DbErr> {
    ESubTask::find()
        .filter(CSubTask::Task.eq(task_id))
        .order_by_asc(CSubTask::OrderIndex)
        .all(db)
        .await
}

async fn apply_assignment<C: ConnectionTrait>(
    db: &C,
    models: &[MSubTask],
    assignment: &[(Uuid, i32)],
) -> Result<(), sea_orm::DbErr> {
    for model in models {
        let Some((_, index)) = assignment.iter().find(|(id, _)| *id == model.id) else {
            continue;
        };

        if model.order_index != *index {
            let mut asub: ASubTask = model.clone().into();
            asub.order_index = Set(*index);
            asub.update(db).await?;
        }
    }

    Ok(())
}

pub async fn get(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project, task)): Path<(String, String, String)>,
) -> WebResult<Json<Vec<MSubTask>>> {
    let scope = get_scope(&state, &user, &org, &project).await?;
    let task = get_task_in_project(&state, scope.project.id, &task).await?;

    let sub_tasks = load_sub_tasks(&state.db, task.id).await?;

    Ok(Json(sub_tasks))
}

pub async fn post(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project, task)): Path<(String, String, String)>,
    Json(body): Json<MakeSubTaskRequest>,
) -> WebResult<(StatusCode, Json<MSubTask>)> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    if !project_allows(scope.effective_role(), ProjectAction::EditTasks) {
        return Err(WebError::forbidden("edit sub-tasks"));
    }

    let task = get_task_in_project(&state, scope.project.id, &task).await?;

    if body.title.trim().is_empty() {
        return Err(WebError::invalid_name("Sub-task Title"));
    }

    // New entries are appended, so the count is the next free index.
    let count = ESubTask::find()
        .filter(CSubTask::Task.eq(task.id))
        .count(&state.db)
        .await?;

    let txn = state.db.begin().await?;

    let sub_task = ASubTask {
        id: Set(Uuid::new_v4()),
        task: Set(task.id),
        title: Set(body.title),
        done: Set(false),
        done_at: Set(None),
        order_index: Set(count as i32),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(&txn)
    .await?;

    // Appending lands behind any done items; re-partition so the new
    // entry joins the open block.
    let models = load_sub_tasks(&txn, task.id).await?;
    let assignment = partition_order(&as_ordered_items(&models));
    apply_assignment(&txn, &models, &assignment).await?;

    let sub_task = ESubTask::find_by_id(sub_task.id)
        .one(&txn)
        .await?
        .ok_or_else(|| WebError::not_found("Sub-task"))?;

    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(sub_task)))
}

pub async fn patch_sub_task(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project, task, sub_task)): Path<(String, String, String, Uuid)>,
    Json(body): Json<PatchSubTaskRequest>,
) -> WebResult<Json<MSubTask>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    if !project_allows(scope.effective_role(), ProjectAction::EditTasks) {
        return Err(WebError::forbidden("edit sub-tasks"));
    }

    let task = get_task_in_project(&state, scope.project.id, &task).await?;

    let sub_task = ESubTask::find()
        .filter(
            Condition::all()
                .add(CSubTask::Id.eq(sub_task))
                .add(CSubTask::Task.eq(task.id)),
        )
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Sub-task"))?;

    let done_changed = body.done.is_some_and(|done| done != sub_task.done);

    let mut asub_task: ASubTask = sub_task.into();

    if let Some(title) = body.title {
        if title.trim().is_empty() {
            return Err(WebError::invalid_name("Sub-task Title"));
        }

        asub_task.title = Set(title);
    }

    if let Some(done) = body.done {
        asub_task.done = Set(done);
        asub_task.done_at = Set(done.then(|| Utc::now().naive_utc()));
    }

    let txn = state.db.begin().await?;
    let mut sub_task = asub_task.update(&txn).await?;

    // Toggling done moves the item across the partition, which shifts
    // every index after it; reload so the response carries the final
    // order_index.
    if done_changed {
        let models = load_sub_tasks(&txn, task.id).await?;
        let assignment = partition_order(&as_ordered_items(&models));
        apply_assignment(&txn, &models, &assignment).await?;

        sub_task = ESubTask::find_by_id(sub_task.id)
            .one(&txn)
            .await?
            .ok_or_else(|| WebError::not_found("Sub-task"))?;
    }

    txn.commit().await?;

    Ok(Json(sub_task))
}

pub async fn put_order(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project, task)): Path<(String, String, String)>,
    Json(body): Json<OrderSubTasksRequest>,
) -> WebResult<Json<Vec<MSubTask>>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    if !project_allows(scope.effective_role(), ProjectAction::EditTasks) {
        return Err(WebError::forbidden("reorder sub-tasks"));
    }

    let task = get_task_in_project(&state, scope.project.id, &task).await?;

    let txn = state.db.begin().await?;
    let models = load_sub_tasks(&txn, task.id).await?;

    let assignment = apply_explicit_order(&as_ordered_items(&models), &body.order)
        .map_err(WebError::BadRequest)?;

    apply_assignment(&txn, &models, &assignment).await?;
    txn.commit().await?;

    let sub_tasks = load_sub_tasks(&state.db, task.id).await?;

    Ok(Json(sub_tasks))
}

pub async fn delete_sub_task(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project, task, sub_task)): Path<(String, String, String, Uuid)>,
) -> WebResult<Json<SuccessResponse>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    if !project_allows(scope.effective_role(), ProjectAction::EditTasks) {
        return Err(WebError::forbidden("delete sub-tasks"));
    }

    let task = get_task_in_project(&state, scope.project.id, &task).await?;

    let sub_task = ESubTask::find()
        .filter(
            Condition::all()
                .add(CSubTask::Id.eq(sub_task))
                .add(CSubTask::Task.eq(task.id)),
        )
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Sub-task"))?;

    let txn = state.db.begin().await?;
    sub_task.delete(&txn).await?;

    let models = load_sub_tasks(&txn, task.id).await?;
    let assignment = partition_order(&as_ordered_items(&models));
    apply_assignment(&txn, &models, &assignment).await?;
    txn.commit().await?;

    Ok(Json(SuccessResponse::ok()))
}
