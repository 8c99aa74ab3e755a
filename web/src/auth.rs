/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Session middleware. Requests carry an opaque bearer token that maps to
//! a row in the session table; the resolved user and session are handed
//! to handlers through request extensions.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use core::types::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::sync::Arc;

use crate::error::WebError;

fn unauthorized(message: &str) -> WebError {
    WebError::Unauthorized(message.to_string())
}

pub async fn authorize(
    state: State<Arc<ServerState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, WebError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Authorization header not found"))?
        .to_str()
        .map_err(|_| unauthorized("Authorization header empty"))?;

    let mut header = auth_header.split_whitespace();
    let (bearer, token) = (header.next(), header.next());

    let token = match (bearer, token) {
        (Some("Bearer"), Some(token)) => token,
        _ => return Err(unauthorized("Invalid Authorization header")),
    };

    let session = ESession::find()
        .filter(CSession::Token.eq(token))
        .one(&state.db)
        .await?
        .ok_or_else(|| unauthorized("Invalid session token"))?;

    if session.expires_at <= Utc::now().naive_utc() {
        return Err(unauthorized("Session expired"));
    }

    let current_user = EUser::find_by_id(session.user)
        .one(&state.db)
        .await?
        .ok_or_else(|| unauthorized("User not found"))?;

    req.extensions_mut().insert(current_user);
    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
