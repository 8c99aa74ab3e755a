/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::input::port_in_range;
use clap::Parser;
use entity::*;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "Trellis", display_name = "Trellis", bin_name = "trellis-server", author = "Trellis Contributors", version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "TRELLIS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    #[arg(long, env = "TRELLIS_IP", default_value = "127.0.0.1")]
    pub ip: String,
    #[arg(long, env = "TRELLIS_PORT", value_parser = port_in_range, default_value_t = 3000)]
    pub port: u16,
    #[arg(
        long,
        env = "TRELLIS_SERVE_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    pub serve_url: String,
    #[arg(long, env = "TRELLIS_DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(long, env = "TRELLIS_DATABASE_URL_FILE")]
    pub database_url_file: Option<String>,
    #[arg(long, env = "TRELLIS_BLOB_ENDPOINT")]
    pub blob_endpoint: Option<String>,
    #[arg(long, env = "TRELLIS_BLOB_TOKEN_FILE")]
    pub blob_token_file: Option<String>,
    #[arg(long, env = "TRELLIS_GITHUB_TOKEN_FILE")]
    pub github_token_file: Option<String>,
    #[arg(long, env = "TRELLIS_REPORT_ERRORS", default_value = "false")]
    pub report_errors: bool,
}

#[derive(Debug)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub cli: Cli,
}

/// Error envelope returned by every failing endpoint.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

/// Success envelope for operations without a meaningful entity to return.
#[derive(Serialize, Deserialize, Debug)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        SuccessResponse { success: true }
    }
}

pub type EFile = file::Entity;
pub type EInvitation = invitation::Entity;
pub type EMember = member::Entity;
pub type EOrganization = organization::Entity;
pub type EProject = project::Entity;
pub type EProjectMember = project_member::Entity;
pub type EProvider = provider::Entity;
pub type ESession = session::Entity;
pub type ESubTask = sub_task::Entity;
pub type ETask = task::Entity;
pub type ETaskMember = task_member::Entity;
pub type EUser = user::Entity;

pub type MFile = file::Model;
pub type MInvitation = invitation::Model;
pub type MMember = member::Model;
pub type MOrganization = organization::Model;
pub type MProject = project::Model;
pub type MProjectMember = project_member::Model;
pub type MProvider = provider::Model;
pub type MSession = session::Model;
pub type MSubTask = sub_task::Model;
pub type MTask = task::Model;
pub type MTaskMember = task_member::Model;
pub type MUser = user::Model;

pub type AFile = file::ActiveModel;
pub type AInvitation = invitation::ActiveModel;
pub type AMember = member::ActiveModel;
pub type AOrganization = organization::ActiveModel;
pub type AProject = project::ActiveModel;
pub type AProjectMember = project_member::ActiveModel;
pub type AProvider = provider::ActiveModel;
pub type ASession = session::ActiveModel;
pub type ASubTask = sub_task::ActiveModel;
pub type ATask = task::ActiveModel;
pub type ATaskMember = task_member::ActiveModel;
pub type AUser = user::ActiveModel;

pub type CFile = file::Column;
pub type CInvitation = invitation::Column;
pub type CMember = member::Column;
pub type COrganization = organization::Column;
pub type CProject = project::Column;
pub type CProjectMember = project_member::Column;
pub type CProvider = provider::Column;
pub type CSession = session::Column;
pub type CSubTask = sub_task::Column;
pub type CTask = task::Column;
pub type CTaskMember = task_member::Column;
pub type CUser = user::Column;
