/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod files;
pub mod invitations;
pub mod members;
pub mod orgs;
pub mod projects;
pub mod providers;
pub mod subtasks;
pub mod tasks;
pub mod user;

use crate::error::{WebError, WebResult};
use axum::extract::Json;
use core::types::SuccessResponse;

pub async fn handle_404() -> WebError {
    WebError::NotFound("Not Found".to_string())
}

pub async fn get_health() -> WebResult<Json<SuccessResponse>> {
    Ok(Json(SuccessResponse::ok()))
}
