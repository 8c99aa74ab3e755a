/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::NaiveDateTime;
use core::database::user_owns_any_organization;
use core::types::*;
use sea_orm::{ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Session tokens never leave the server.
#[derive(Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub id: Uuid,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub current: bool,
}

pub async fn get(Extension(user): Extension<MUser>) -> WebResult<Json<MUser>> {
    Ok(Json(user))
}

pub async fn delete_user(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<SuccessResponse>> {
    if user_owns_any_organization(state.0.clone(), user.id).await? {
        return Err(WebError::forbidden(
            "delete an account that owns an organization",
        ));
    }

    let txn = state.db.begin().await?;

    ESession::delete_many()
        .filter(CSession::User.eq(user.id))
        .exec(&txn)
        .await?;

    user.delete(&txn).await?;
    txn.commit().await?;

    Ok(Json(SuccessResponse::ok()))
}

pub async fn get_sessions(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Extension(session): Extension<MSession>,
) -> WebResult<Json<Vec<SessionResponse>>> {
    let sessions = ESession::find()
        .filter(CSession::User.eq(user.id))
        .all(&state.db)
        .await?;

    let sessions: Vec<SessionResponse> = sessions
        .iter()
        .map(|s| SessionResponse {
            id: s.id,
            ip_address: s.ip_address.clone(),
            user_agent: s.user_agent.clone(),
            expires_at: s.expires_at,
            created_at: s.created_at,
            current: s.id == session.id,
        })
        .collect();

    Ok(Json(sessions))
}

/// Revokes every session of the user, including the current one.
pub async fn delete_sessions(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<SuccessResponse>> {
    ESession::delete_many()
        .filter(CSession::User.eq(user.id))
        .exec(&state.db)
        .await?;

    Ok(Json(SuccessResponse::ok()))
}

pub async fn delete_session(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(session): Path<Uuid>,
) -> WebResult<Json<SuccessResponse>> {
    let session = ESession::find()
        .filter(
            Condition::all()
                .add(CSession::Id.eq(session))
                .add(CSession::User.eq(user.id)),
        )
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Session"))?;

    session.delete(&state.db).await?;

    Ok(Json(SuccessResponse::ok()))
}
