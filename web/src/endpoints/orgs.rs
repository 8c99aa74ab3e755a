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
use core::consts::ORG_SLUG_LENGTH;
use core::database::get_organization_by_slug;
use core::input::{generate_slug, validate_display_name};
use core::policy::{OrgAction, org_allows};
use core::types::*;
use entity::member::OrgRole;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, ModelTrait, QueryFilter, QuerySelect,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeOrganizationRequest {
    pub name: String,
    #[serde(default)]
    pub org_type: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PatchOrganizationRequest {
    pub name: Option<String>,
    pub org_type: Option<String>,
    pub plan: Option<String>,
}

/// Deleting an organization requires typing its name back.
#[derive(Serialize, Deserialize, Debug)]
pub struct DeleteOrganizationRequest {
    pub confirm_name: String,
}

pub async fn get(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<Vec<MOrganization>>> {
    let organizations = EOrganization::find()
        .join_rev(
            JoinType::InnerJoin,
            EMember::belongs_to(entity::organization::Entity)
                .from(CMember::Organization)
                .to(COrganization::Id)
                .into(),
        )
        .filter(CMember::User.eq(user.id))
        .all(&state.db)
        .await?;

    Ok(Json(organizations))
}

pub async fn post(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Json(body): Json<MakeOrganizationRequest>,
) -> WebResult<(StatusCode, Json<MOrganization>)> {
    validate_display_name(body.name.as_str()).map_err(WebError::BadRequest)?;

    let mut slug = generate_slug(ORG_SLUG_LENGTH);

    while EOrganization::find()
        .filter(COrganization::Slug.eq(slug.clone()))
        .one(&state.db)
        .await?
        .is_some()
    {
        slug = generate_slug(ORG_SLUG_LENGTH);
    }

    let now = Utc::now().naive_utc();
    let txn = state.db.begin().await?;

    let organization = AOrganization {
        id: Set(Uuid::new_v4()),
        name: Set(body.name.clone()),
        slug: Set(slug),
        org_type: Set(body.org_type.unwrap_or_else(|| "team".to_string())),
        plan: Set(body.plan.unwrap_or_else(|| "free".to_string())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let member = AMember {
        id: Set(Uuid::new_v4()),
        organization: Set(organization.id),
        user: Set(user.id),
        role: Set(OrgRole::Owner),
    };

    member.insert(&txn).await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(organization)))
}

pub async fn get_organization(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(org): Path<String>,
) -> WebResult<Json<MOrganization>> {
    let (organization, _member) = get_organization_by_slug(state.0.clone(), user.id, &org)
        .await?
        .ok_or_else(|| WebError::not_found("Organization"))?;

    Ok(Json(organization))
}

pub async fn patch_organization(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(org): Path<String>,
    Json(body): Json<PatchOrganizationRequest>,
) -> WebResult<Json<MOrganization>> {
    let (organization, member) = get_organization_by_slug(state.0.clone(), user.id, &org)
        .await?
        .ok_or_else(|| WebError::not_found("Organization"))?;

    if !org_allows(member.role, OrgAction::ManageOrg) {
        return Err(WebError::forbidden("manage this organization"));
    }

    let mut aorganization: AOrganization = organization.into();

    if let Some(name) = body.name {
        validate_display_name(name.as_str()).map_err(WebError::BadRequest)?;
        aorganization.name = Set(name);
    }

    if let Some(org_type) = body.org_type {
        aorganization.org_type = Set(org_type);
    }

    if let Some(plan) = body.plan {
        aorganization.plan = Set(plan);
    }

    aorganization.updated_at = Set(Utc::now().naive_utc());

    let organization = aorganization.update(&state.db).await?;

    Ok(Json(organization))
}

pub async fn delete_organization(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(org): Path<String>,
    Json(body): Json<DeleteOrganizationRequest>,
) -> WebResult<Json<SuccessResponse>> {
    let (organization, member) = get_organization_by_slug(state.0.clone(), user.id, &org)
        .await?
        .ok_or_else(|| WebError::not_found("Organization"))?;

    if !org_allows(member.role, OrgAction::ManageOrg) {
        return Err(WebError::forbidden("delete this organization"));
    }

    if body.confirm_name != organization.name {
        return Err(WebError::BadRequest(
            "Organization name confirmation does not match".to_string(),
        ));
    }

    // Members, projects, tasks and invitations go with it via cascade.
    organization.delete(&state.db).await?;

    Ok(Json(SuccessResponse::ok()))
}
