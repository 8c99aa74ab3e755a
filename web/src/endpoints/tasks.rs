/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{NaiveDateTime, Utc};
use core::consts::TASK_SLUG_LENGTH;
use core::database::{ProjectScope, fan_out_task_members, get_project_by_slug};
use core::input::{generate_slug, validate_display_name};
use core::policy::{ProjectAction, project_allows};
use core::types::*;
use entity::task::{Priority, TaskStatus, TaskType};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Distinguishes an absent field from an explicit null, so PATCH can
/// clear assignee and deadline.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub task_type: Option<TaskType>,
    #[serde(default)]
    pub deadline: Option<NaiveDateTime>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PatchTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_to: Option<Option<Uuid>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub task_type: Option<TaskType>,
    #[serde(default, deserialize_with = "nullable")]
    pub deadline: Option<Option<NaiveDateTime>>,
}

#[derive(Deserialize, Debug)]
pub struct TaskListQuery {
    pub archived: Option<bool>,
}

pub(crate) async fn get_task_in_project(
    state: &Arc<ServerState>,
    project_id: Uuid,
    slug: &str,
) -> WebResult<MTask> {
    ETask::find()
        .filter(
            Condition::all()
                .add(CTask::Project.eq(project_id))
                .add(CTask::Slug.eq(slug)),
        )
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Task"))
}

pub(crate) async fn get_scope(
    state: &State<Arc<ServerState>>,
    user: &MUser,
    org: &str,
    project: &str,
) -> WebResult<ProjectScope> {
    get_project_by_slug(state.0.clone(), user.id, org, project)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))
}

pub async fn get(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project)): Path<(String, String)>,
    Query(query): Query<TaskListQuery>,
) -> WebResult<Json<Vec<MTask>>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    let mut condition = Condition::all().add(CTask::Project.eq(scope.project.id));

    if let Some(archived) = query.archived {
        condition = condition.add(CTask::Archived.eq(archived));
    }

    let tasks = ETask::find()
        .filter(condition)
        .order_by_asc(CTask::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(tasks))
}

pub async fn post(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project)): Path<(String, String)>,
    Json(body): Json<MakeTaskRequest>,
) -> WebResult<(StatusCode, Json<MTask>)> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    if !project_allows(scope.effective_role(), ProjectAction::EditTasks) {
        return Err(WebError::forbidden("create tasks"));
    }

    validate_display_name(body.title.as_str()).map_err(WebError::BadRequest)?;

    if let Some(assignee) = body.assigned_to {
        let member = EMember::find()
            .filter(
                Condition::all()
                    .add(CMember::Organization.eq(scope.organization.id))
                    .add(CMember::User.eq(assignee)),
            )
            .one(&state.db)
            .await?;

        if member.is_none() {
            return Err(WebError::BadRequest(
                "Assignee is not an organization member".to_string(),
            ));
        }
    }

    let mut slug = generate_slug(TASK_SLUG_LENGTH);

    while ETask::find()
        .filter(
            Condition::all()
                .add(CTask::Project.eq(scope.project.id))
                .add(CTask::Slug.eq(slug.clone())),
        )
        .one(&state.db)
        .await?
        .is_some()
    {
        slug = generate_slug(TASK_SLUG_LENGTH);
    }

    let status = body.status.unwrap_or(TaskStatus::Todo);
    let now = Utc::now().naive_utc();
    let txn = state.db.begin().await?;

    let task = ATask {
        id: Set(Uuid::new_v4()),
        project: Set(scope.project.id),
        slug: Set(slug),
        title: Set(body.title.clone()),
        description: Set(body.description.unwrap_or_default()),
        assigned_to: Set(body.assigned_to),
        status: Set(status),
        priority: Set(body.priority.unwrap_or(Priority::None)),
        task_type: Set(body.task_type.unwrap_or(TaskType::Task)),
        deadline: Set(body.deadline),
        completed_at: Set((status == TaskStatus::Done).then_some(now)),
        archived: Set(false),
        archived_at: Set(None),
        created_by: Set(Some(user.id)),
        updated_by: Set(user.id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    fan_out_task_members(&txn, scope.organization.id, task.id).await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project, task)): Path<(String, String, String)>,
) -> WebResult<Json<MTask>> {
    let scope = get_scope(&state, &user, &org, &project).await?;
    let task = get_task_in_project(&state, scope.project.id, &task).await?;

    Ok(Json(task))
}

pub async fn patch_task(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project, task)): Path<(String, String, String)>,
    Json(body): Json<PatchTaskRequest>,
) -> WebResult<Json<MTask>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    if !project_allows(scope.effective_role(), ProjectAction::EditTasks) {
        return Err(WebError::forbidden("edit tasks"));
    }

    let task = get_task_in_project(&state, scope.project.id, &task).await?;
    let now = Utc::now().naive_utc();
    let previous_status = task.status;

    let mut atask: ATask = task.into();

    if let Some(title) = body.title {
        validate_display_name(title.as_str()).map_err(WebError::BadRequest)?;
        atask.title = Set(title);
    }

    if let Some(description) = body.description {
        atask.description = Set(description);
    }

    if let Some(assigned_to) = body.assigned_to {
        if let Some(assignee) = assigned_to {
            let member = EMember::find()
                .filter(
                    Condition::all()
                        .add(CMember::Organization.eq(scope.organization.id))
                        .add(CMember::User.eq(assignee)),
                )
                .one(&state.db)
                .await?;

            if member.is_none() {
                return Err(WebError::BadRequest(
                    "Assignee is not an organization member".to_string(),
                ));
            }
        }

        atask.assigned_to = Set(assigned_to);
    }

    if let Some(status) = body.status {
        atask.status = Set(status);

        // completed_at tracks Done transitions in both directions.
        if status == TaskStatus::Done && previous_status != TaskStatus::Done {
            atask.completed_at = Set(Some(now));
        } else if status != TaskStatus::Done {
            atask.completed_at = Set(None);
        }
    }

    if let Some(priority) = body.priority {
        atask.priority = Set(priority);
    }

    if let Some(task_type) = body.task_type {
        atask.task_type = Set(task_type);
    }

    if let Some(deadline) = body.deadline {
        atask.deadline = Set(deadline);
    }

    atask.updated_by = Set(user.id);
    atask.updated_at = Set(now);

    let task = atask.update(&state.db).await?;

    Ok(Json(task))
}

pub async fn delete_task(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project, task)): Path<(String, String, String)>,
) -> WebResult<Json<SuccessResponse>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    if !project_allows(scope.effective_role(), ProjectAction::EditTasks) {
        return Err(WebError::forbidden("delete tasks"));
    }

    let task = get_task_in_project(&state, scope.project.id, &task).await?;
    task.delete(&state.db).await?;

    Ok(Json(SuccessResponse::ok()))
}

pub async fn post_archive(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project, task)): Path<(String, String, String)>,
) -> WebResult<Json<MTask>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    if !project_allows(scope.effective_role(), ProjectAction::EditTasks) {
        return Err(WebError::forbidden("archive tasks"));
    }

    let task = get_task_in_project(&state, scope.project.id, &task).await?;
    let now = Utc::now().naive_utc();

    let mut atask: ATask = task.into();
    atask.archived = Set(true);
    atask.archived_at = Set(Some(now));
    atask.updated_by = Set(user.id);
    atask.updated_at = Set(now);

    let task = atask.update(&state.db).await?;

    Ok(Json(task))
}

pub async fn delete_archive(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project, task)): Path<(String, String, String)>,
) -> WebResult<Json<MTask>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    if !project_allows(scope.effective_role(), ProjectAction::EditTasks) {
        return Err(WebError::forbidden("restore tasks"));
    }

    let task = get_task_in_project(&state, scope.project.id, &task).await?;

    let mut atask: ATask = task.into();
    atask.archived = Set(false);
    atask.archived_at = Set(None);
    atask.updated_by = Set(user.id);
    atask.updated_at = Set(Utc::now().naive_utc());

    let task = atask.update(&state.db).await?;

    Ok(Json(task))
}
