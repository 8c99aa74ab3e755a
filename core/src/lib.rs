/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod consts;
pub mod database;
pub mod input;
pub mod ordering;
pub mod policy;
pub mod stats;
pub mod storage;
pub mod types;

use clap::Parser;
use database::connect_db;
use std::sync::Arc;
use types::*;

pub async fn init_state() -> Arc<ServerState> {
    let cli = Cli::parse();

    println!("Starting Trellis Server on {}:{}", cli.ip, cli.port);

    let db = connect_db(&cli)
        .await
        .expect("failed to connect to database");

    Arc::new(ServerState { db, cli })
}
