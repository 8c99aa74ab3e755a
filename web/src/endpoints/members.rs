/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use core::database::get_organization_by_slug;
use core::policy::{OrgAction, org_allows};
use core::types::*;
use entity::member::OrgRole;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct MemberResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub name: String,
    pub email: String,
    pub role: OrgRole,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PatchMemberRequest {
    pub role: OrgRole,
}

pub async fn get(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(org): Path<String>,
) -> WebResult<Json<Vec<MemberResponse>>> {
    let (organization, _member) = get_organization_by_slug(state.0.clone(), user.id, &org)
        .await?
        .ok_or_else(|| WebError::not_found("Organization"))?;

    let members = EMember::find()
        .filter(CMember::Organization.eq(organization.id))
        .all(&state.db)
        .await?;

    let user_ids: Vec<Uuid> = members.iter().map(|m| m.user).collect();
    let users = EUser::find()
        .filter(CUser::Id.is_in(user_ids))
        .all(&state.db)
        .await?;

    let members: Vec<MemberResponse> = members
        .iter()
        .filter_map(|m| {
            users.iter().find(|u| u.id == m.user).map(|u| MemberResponse {
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

pub async fn patch_member(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, user_id)): Path<(String, Uuid)>,
    Json(body): Json<PatchMemberRequest>,
) -> WebResult<Json<MMember>> {
    let (organization, member) = get_organization_by_slug(state.0.clone(), user.id, &org)
        .await?
        .ok_or_else(|| WebError::not_found("Organization"))?;

    if !org_allows(member.role, OrgAction::ChangeRoles) {
        return Err(WebError::forbidden("change member roles"));
    }

    if user_id == user.id {
        return Err(WebError::forbidden("change your own role"));
    }

    let target = EMember::find()
        .filter(
            Condition::all()
                .add(CMember::Organization.eq(organization.id))
                .add(CMember::User.eq(user_id)),
        )
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Member"))?;

    if target.role == OrgRole::Owner {
        return Err(WebError::forbidden("change the owner's role"));
    }

    if body.role == OrgRole::Owner {
        return Err(WebError::Conflict(
            "Organization already has an owner".to_string(),
        ));
    }

    let mut atarget: AMember = target.into();
    atarget.role = Set(body.role);

    let target = atarget.update(&state.db).await?;

    Ok(Json(target))
}

pub async fn delete_member(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, user_id)): Path<(String, Uuid)>,
) -> WebResult<Json<SuccessResponse>> {
    let (organization, member) = get_organization_by_slug(state.0.clone(), user.id, &org)
        .await?
        .ok_or_else(|| WebError::not_found("Organization"))?;

    if !org_allows(member.role, OrgAction::ManageMembers) {
        return Err(WebError::forbidden("remove members"));
    }

    let target = EMember::find()
        .filter(
            Condition::all()
                .add(CMember::Organization.eq(organization.id))
                .add(CMember::User.eq(user_id)),
        )
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Member"))?;

    if target.role == OrgRole::Owner {
        return Err(WebError::forbidden("remove the owner"));
    }

    let txn = state.db.begin().await?;

    // Derived project and task access goes with the membership.
    let project_ids: Vec<Uuid> = EProject::find()
        .filter(CProject::Organization.eq(organization.id))
        .all(&txn)
        .await?
        .iter()
        .map(|p| p.id)
        .collect();

    if !project_ids.is_empty() {
        EProjectMember::delete_many()
            .filter(
                Condition::all()
                    .add(CProjectMember::User.eq(user_id))
                    .add(CProjectMember::Project.is_in(project_ids.clone())),
            )
            .exec(&txn)
            .await?;

        let task_ids: Vec<Uuid> = ETask::find()
            .filter(CTask::Project.is_in(project_ids))
            .all(&txn)
            .await?
            .iter()
            .map(|t| t.id)
            .collect();

        if !task_ids.is_empty() {
            ETaskMember::delete_many()
                .filter(
                    Condition::all()
                        .add(CTaskMember::User.eq(user_id))
                        .add(CTaskMember::Task.is_in(task_ids)),
                )
                .exec(&txn)
                .await?;
        }
    }

    target.delete(&txn).await?;
    txn.commit().await?;

    Ok(Json(SuccessResponse::ok()))
}
