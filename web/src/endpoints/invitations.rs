/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{Duration, Utc};
use core::consts::INVITATION_TTL_DAYS;
use core::database::get_organization_by_slug;
use core::policy::{OrgAction, org_allows};
use core::types::*;
use email_address::EmailAddress;
use entity::invitation::InvitationStatus;
use entity::member::OrgRole;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeInvitationRequest {
    pub email: String,
    pub role: OrgRole,
}

pub async fn get(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(org): Path<String>,
) -> WebResult<Json<Vec<MInvitation>>> {
    let (organization, member) = get_organization_by_slug(state.0.clone(), user.id, &org)
        .await?
        .ok_or_else(|| WebError::not_found("Organization"))?;

    if !org_allows(member.role, OrgAction::ManageMembers) {
        return Err(WebError::forbidden("view invitations"));
    }

    let invitations = EInvitation::find()
        .filter(CInvitation::Organization.eq(organization.id))
        .all(&state.db)
        .await?;

    Ok(Json(invitations))
}

pub async fn post(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(org): Path<String>,
    Json(body): Json<MakeInvitationRequest>,
) -> WebResult<(StatusCode, Json<MInvitation>)> {
    let (organization, member) = get_organization_by_slug(state.0.clone(), user.id, &org)
        .await?
        .ok_or_else(|| WebError::not_found("Organization"))?;

    if !org_allows(member.role, OrgAction::ManageMembers) {
        return Err(WebError::forbidden("invite members"));
    }

    if !EmailAddress::is_valid(body.email.as_str()) {
        return Err(WebError::BadRequest("Invalid email address".to_string()));
    }

    if body.role == OrgRole::Owner {
        return Err(WebError::BadRequest(
            "Cannot invite a second owner".to_string(),
        ));
    }

    // An address that already belongs to a member cannot be invited again.
    if let Some(invited_user) = EUser::find()
        .filter(CUser::Email.eq(body.email.clone()))
        .one(&state.db)
        .await?
    {
        let existing = EMember::find()
            .filter(
                Condition::all()
                    .add(CMember::Organization.eq(organization.id))
                    .add(CMember::User.eq(invited_user.id)),
            )
            .one(&state.db)
            .await?;

        if existing.is_some() {
            return Err(WebError::already_exists("Member"));
        }
    }

    let pending = EInvitation::find()
        .filter(
            Condition::all()
                .add(CInvitation::Organization.eq(organization.id))
                .add(CInvitation::Email.eq(body.email.clone()))
                .add(CInvitation::Status.eq(InvitationStatus::Pending)),
        )
        .one(&state.db)
        .await?;

    if pending.is_some() {
        return Err(WebError::already_exists("Invitation"));
    }

    let now = Utc::now().naive_utc();

    let invitation = AInvitation {
        id: Set(Uuid::new_v4()),
        organization: Set(organization.id),
        email: Set(body.email),
        role: Set(body.role),
        status: Set(InvitationStatus::Pending),
        invited_by: Set(Some(user.id)),
        expires_at: Set(now + Duration::days(INVITATION_TTL_DAYS)),
        created_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(invitation)))
}

/// Pending, unexpired invitations addressed to the requesting user.
pub async fn get_own(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<Vec<MInvitation>>> {
    let invitations = EInvitation::find()
        .filter(
            Condition::all()
                .add(CInvitation::Email.eq(user.email.clone()))
                .add(CInvitation::Status.eq(InvitationStatus::Pending))
                .add(CInvitation::ExpiresAt.gt(Utc::now().naive_utc())),
        )
        .all(&state.db)
        .await?;

    Ok(Json(invitations))
}

pub async fn post_accept(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(invitation): Path<Uuid>,
) -> WebResult<Json<SuccessResponse>> {
    let invitation = EInvitation::find_by_id(invitation)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Invitation"))?;

    if invitation.email != user.email {
        return Err(WebError::forbidden("accept this invitation"));
    }

    if invitation.status != InvitationStatus::Pending {
        return Err(WebError::Conflict("Invitation is not pending".to_string()));
    }

    if invitation.expires_at <= Utc::now().naive_utc() {
        return Err(WebError::BadRequest("Invitation has expired".to_string()));
    }

    let existing = EMember::find()
        .filter(
            Condition::all()
                .add(CMember::Organization.eq(invitation.organization))
                .add(CMember::User.eq(user.id)),
        )
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(WebError::already_exists("Member"));
    }

    let txn = state.db.begin().await?;

    let member = AMember {
        id: Set(Uuid::new_v4()),
        organization: Set(invitation.organization),
        user: Set(user.id),
        role: Set(invitation.role),
    };

    member.insert(&txn).await?;

    let mut ainvitation: AInvitation = invitation.into();
    ainvitation.status = Set(InvitationStatus::Accepted);
    ainvitation.update(&txn).await?;

    txn.commit().await?;

    Ok(Json(SuccessResponse::ok()))
}

pub async fn post_reject(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(invitation): Path<Uuid>,
) -> WebResult<Json<SuccessResponse>> {
    let invitation = EInvitation::find_by_id(invitation)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Invitation"))?;

    if invitation.email != user.email {
        return Err(WebError::forbidden("reject this invitation"));
    }

    if invitation.status != InvitationStatus::Pending {
        return Err(WebError::Conflict("Invitation is not pending".to_string()));
    }

    let mut ainvitation: AInvitation = invitation.into();
    ainvitation.status = Set(InvitationStatus::Rejected);
    ainvitation.update(&state.db).await?;

    Ok(Json(SuccessResponse::ok()))
}
