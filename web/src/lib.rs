/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod auth;
pub mod endpoints;
pub mod error;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use core::types::ServerState;
use std::sync::Arc;

// Multipart uploads go through the request body in one piece.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route(
            "/api/org",
            get(endpoints::orgs::get).post(endpoints::orgs::post),
        )
        .route(
            "/api/org/{org}",
            get(endpoints::orgs::get_organization)
                .patch(endpoints::orgs::patch_organization)
                .delete(endpoints::orgs::delete_organization),
        )
        .route("/api/org/{org}/members", get(endpoints::members::get))
        .route(
            "/api/org/{org}/members/{user_id}",
            axum::routing::patch(endpoints::members::patch_member)
                .delete(endpoints::members::delete_member),
        )
        .route(
            "/api/org/{org}/invitations",
            get(endpoints::invitations::get).post(endpoints::invitations::post),
        )
        .route(
            "/api/org/{org}/project",
            get(endpoints::projects::get).post(endpoints::projects::post),
        )
        .route(
            "/api/org/{org}/project/{project}",
            get(endpoints::projects::get_project)
                .patch(endpoints::projects::patch_project)
                .delete(endpoints::projects::delete_project),
        )
        .route(
            "/api/org/{org}/project/{project}/members",
            get(endpoints::projects::get_members),
        )
        .route(
            "/api/org/{org}/project/{project}/verify-members",
            post(endpoints::projects::post_verify_members),
        )
        .route(
            "/api/org/{org}/project/{project}/stats",
            get(endpoints::projects::get_stats),
        )
        .route(
            "/api/org/{org}/project/{project}/task",
            get(endpoints::tasks::get).post(endpoints::tasks::post),
        )
        .route(
            "/api/org/{org}/project/{project}/task/{task}",
            get(endpoints::tasks::get_task)
                .patch(endpoints::tasks::patch_task)
                .delete(endpoints::tasks::delete_task),
        )
        .route(
            "/api/org/{org}/project/{project}/task/{task}/archive",
            post(endpoints::tasks::post_archive).delete(endpoints::tasks::delete_archive),
        )
        .route(
            "/api/org/{org}/project/{project}/task/{task}/subtask",
            get(endpoints::subtasks::get).post(endpoints::subtasks::post),
        )
        .route(
            "/api/org/{org}/project/{project}/task/{task}/subtask/order",
            put(endpoints::subtasks::put_order),
        )
        .route(
            "/api/org/{org}/project/{project}/task/{task}/subtask/{sub_task}",
            axum::routing::patch(endpoints::subtasks::patch_sub_task)
                .delete(endpoints::subtasks::delete_sub_task),
        )
        .route(
            "/api/org/{org}/project/{project}/file",
            get(endpoints::files::get).post(endpoints::files::post),
        )
        .route(
            "/api/org/{org}/project/{project}/file/{file}",
            delete(endpoints::files::delete_file),
        )
        .route(
            "/api/org/{org}/project/{project}/file/{file}/archive",
            post(endpoints::files::post_archive),
        )
        .route(
            "/api/org/{org}/project/{project}/provider",
            get(endpoints::providers::get).put(endpoints::providers::put),
        )
        .route(
            "/api/org/{org}/project/{project}/commits",
            get(endpoints::providers::get_commits),
        )
        .route(
            "/api/user",
            get(endpoints::user::get).delete(endpoints::user::delete_user),
        )
        .route("/api/user/invitations", get(endpoints::invitations::get_own))
        .route(
            "/api/user/invitations/{invitation}/accept",
            post(endpoints::invitations::post_accept),
        )
        .route(
            "/api/user/invitations/{invitation}/reject",
            post(endpoints::invitations::post_reject),
        )
        .route(
            "/api/user/sessions",
            get(endpoints::user::get_sessions).delete(endpoints::user::delete_sessions),
        )
        .route(
            "/api/user/sessions/{session}",
            delete(endpoints::user::delete_session),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::authorize,
        ))
        .route("/api/health", get(endpoints::get_health))
        .fallback(endpoints::handle_404)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve_web(state: Arc<ServerState>) -> std::io::Result<()> {
    let server_url = format!("{}:{}", state.cli.ip, state.cli.port);
    let app = build_router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    tracing::info!("Listening on {}", server_url);
    axum::serve(listener, app).await
}
