/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{NaiveDateTime, Utc};
use core::database::{get_organization_by_slug, get_project_by_slug, sync_project_members};
use core::input::{generate_slug, slugify, validate_display_name};
use core::policy::{OrgAction, ProjectAction, org_allows, project_allows};
use core::stats::{self, TaskStats};
use core::types::*;
use entity::project::ProjectStatus;
use entity::project_member::ProjectRole;
use entity::task::Priority;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PatchProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDateTime>,
}

/// Deleting a project requires typing its name back.
#[derive(Serialize, Deserialize, Debug)]
pub struct DeleteProjectRequest {
    pub confirm_name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProjectMemberResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub name: String,
    pub email: String,
    pub role: ProjectRole,
}

pub async fn get(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(org): Path<String>,
) -> WebResult<Json<Vec<MProject>>> {
    let (organization, _member) = get_organization_by_slug(state.0.clone(), user.id, &org)
        .await?
        .ok_or_else(|| WebError::not_found("Organization"))?;

    let projects = EProject::find()
        .filter(CProject::Organization.eq(organization.id))
        .order_by_asc(CProject::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(projects))
}

pub async fn post(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(org): Path<String>,
    Json(body): Json<MakeProjectRequest>,
) -> WebResult<(StatusCode, Json<MProject>)> {
    let (organization, member) = get_organization_by_slug(state.0.clone(), user.id, &org)
        .await?
        .ok_or_else(|| WebError::not_found("Organization"))?;

    if !org_allows(member.role, OrgAction::CreateProject) {
        return Err(WebError::forbidden("create projects"));
    }

    validate_display_name(body.name.as_str()).map_err(WebError::BadRequest)?;

    let mut slug = slugify(body.name.as_str());

    if slug.is_empty() {
        return Err(WebError::invalid_name("Project Name"));
    }

    let taken = EProject::find()
        .filter(
            Condition::all()
                .add(CProject::Organization.eq(organization.id))
                .add(CProject::Slug.eq(slug.clone())),
        )
        .one(&state.db)
        .await?
        .is_some();

    if taken {
        slug = format!("{}-{}", slug, generate_slug(4));
    }

    let now = Utc::now().naive_utc();
    let txn = state.db.begin().await?;

    let project = AProject {
        id: Set(Uuid::new_v4()),
        organization: Set(organization.id),
        name: Set(body.name.clone()),
        slug: Set(slug),
        description: Set(body.description.unwrap_or_default()),
        status: Set(body.status.unwrap_or(ProjectStatus::Planned)),
        priority: Set(body.priority.unwrap_or(Priority::None)),
        due_date: Set(body.due_date),
        created_by: Set(Some(user.id)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    sync_project_members(&txn, organization.id, project.id, Some(user.id)).await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project)): Path<(String, String)>,
) -> WebResult<Json<MProject>> {
    let scope = get_project_by_slug(state.0.clone(), user.id, &org, &project)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    Ok(Json(scope.project))
}

pub async fn patch_project(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project)): Path<(String, String)>,
    Json(body): Json<PatchProjectRequest>,
) -> WebResult<Json<MProject>> {
    let scope = get_project_by_slug(state.0.clone(), user.id, &org, &project)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    if !project_allows(scope.effective_role(), ProjectAction::ManageProject) {
        return Err(WebError::forbidden("manage this project"));
    }

    let mut aproject: AProject = scope.project.into();

    if let Some(name) = body.name {
        validate_display_name(name.as_str()).map_err(WebError::BadRequest)?;
        aproject.name = Set(name);
    }

    if let Some(description) = body.description {
        aproject.description = Set(description);
    }

    if let Some(status) = body.status {
        aproject.status = Set(status);
    }

    if let Some(priority) = body.priority {
        aproject.priority = Set(priority);
    }

    if let Some(due_date) = body.due_date {
        aproject.due_date = Set(Some(due_date));
    }

    aproject.updated_at = Set(Utc::now().naive_utc());

    let project = aproject.update(&state.db).await?;

    Ok(Json(project))
}

pub async fn delete_project(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project)): Path<(String, String)>,
    Json(body): Json<DeleteProjectRequest>,
) -> WebResult<Json<SuccessResponse>> {
    let scope = get_project_by_slug(state.0.clone(), user.id, &org, &project)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    if !project_allows(scope.effective_role(), ProjectAction::ManageProject) {
        return Err(WebError::forbidden("delete this project"));
    }

    if body.confirm_name != scope.project.name {
        return Err(WebError::BadRequest(
            "Project name confirmation does not match".to_string(),
        ));
    }

    scope.project.delete(&state.db).await?;

    Ok(Json(SuccessResponse::ok()))
}

pub async fn get_members(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project)): Path<(String, String)>,
) -> WebResult<Json<Vec<ProjectMemberResponse>>> {
    let scope = get_project_by_slug(state.0.clone(), user.id, &org, &project)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    let members = EProjectMember::find()
        .filter(CProjectMember::Project.eq(scope.project.id))
        .all(&state.db)
        .await?;

    let user_ids: Vec<Uuid> = members.iter().map(|m| m.user).collect();
    let users = EUser::find()
        .filter(CUser::Id.is_in(user_ids))
        .all(&state.db)
        .await?;

    let members: Vec<ProjectMemberResponse> = members
        .iter()
        .filter_map(|m| {
            users
                .iter()
                .find(|u| u.id == m.user)
                .map(|u| ProjectMemberResponse {
                    id: m.id,
                    user: u.id,
                    name: u.name.clone(),
                    email: u.email.clone(),
                    role: m.role,
                })
        })
        .collect();

    Ok(Json(members))
}

/// Re-syncs project membership from the organization roster. Only adds
/// missing rows; explicit project roles are never overwritten.
pub async fn post_verify_members(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project)): Path<(String, String)>,
) -> WebResult<Json<SuccessResponse>> {
    let scope = get_project_by_slug(state.0.clone(), user.id, &org, &project)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    if !project_allows(scope.effective_role(), ProjectAction::ManageProject) {
        return Err(WebError::forbidden("manage this project"));
    }

    let txn = state.db.begin().await?;
    sync_project_members(&txn, scope.organization.id, scope.project.id, None).await?;
    txn.commit().await?;

    Ok(Json(SuccessResponse::ok()))
}

pub async fn get_stats(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project)): Path<(String, String)>,
) -> WebResult<Json<TaskStats>> {
    let scope = get_project_by_slug(state.0.clone(), user.id, &org, &project)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    let tasks = ETask::find()
        .filter(
            Condition::all()
                .add(CTask::Project.eq(scope.project.id))
                .add(CTask::Archived.eq(false)),
        )
        .order_by_asc(CTask::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(stats::compute(&tasks, Utc::now().naive_utc())))
}
