/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use core::init_state;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
pub async fn main() -> std::io::Result<()> {
    let state = init_state().await;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&state.cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let _sentry_guard = if state.cli.report_errors {
        Some(sentry::init(sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        }))
    } else {
        None
    };

    web::serve_web(Arc::clone(&state)).await
}
