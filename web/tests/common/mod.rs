/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#![allow(dead_code)]

use chrono::NaiveDate;
use core::types::*;
use entity::member::OrgRole;
use entity::project::ProjectStatus;
use entity::task::{Priority, TaskStatus, TaskType};
use entity::*;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use uuid::Uuid;

pub fn create_mock_cli() -> Cli {
    Cli {
        log_level: "debug".to_string(),
        ip: "127.0.0.1".to_string(),
        port: 3000,
        serve_url: "http://127.0.0.1:3000".to_string(),
        database_url: Some("mock://test".to_string()),
        database_url_file: None,
        blob_endpoint: None,
        blob_token_file: None,
        github_token_file: None,
        report_errors: false,
    }
}

pub fn create_mock_state() -> Arc<ServerState> {
    let cli = create_mock_cli();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    Arc::new(ServerState { db, cli })
}

pub fn create_state_with_db(db: DatabaseConnection) -> Arc<ServerState> {
    Arc::new(ServerState {
        db,
        cli: create_mock_cli(),
    })
}

pub fn naive_date() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_user(email: &str) -> user::Model {
    user::Model {
        id: Uuid::new_v4(),
        name: "Jordan Baker".to_owned(),
        email: email.to_owned(),
        image: None,
        created_at: naive_date(),
        updated_at: naive_date(),
    }
}

pub fn make_organization(slug: &str) -> organization::Model {
    organization::Model {
        id: Uuid::new_v4(),
        name: "Acme Inc".to_owned(),
        slug: slug.to_owned(),
        org_type: "team".to_owned(),
        plan: "free".to_owned(),
        created_at: naive_date(),
        updated_at: naive_date(),
    }
}

pub fn make_member(organization: Uuid, user: Uuid, role: OrgRole) -> member::Model {
    member::Model {
        id: Uuid::new_v4(),
        organization,
        user,
        role,
    }
}

pub fn make_project(organization: Uuid) -> project::Model {
    project::Model {
        id: Uuid::new_v4(),
        organization,
        name: "Website Redesign".to_owned(),
        slug: "website-redesign".to_owned(),
        description: String::new(),
        status: ProjectStatus::Active,
        priority: Priority::None,
        due_date: None,
        created_by: Some(Uuid::new_v4()),
        created_at: naive_date(),
        updated_at: naive_date(),
    }
}

pub fn make_task(project: Uuid, status: TaskStatus) -> task::Model {
    task::Model {
        id: Uuid::new_v4(),
        project,
        slug: "a1b2c3d4".to_owned(),
        title: "Fix the flaky pipeline".to_owned(),
        description: String::new(),
        assigned_to: None,
        status,
        priority: Priority::Medium,
        task_type: TaskType::Task,
        deadline: None,
        completed_at: (status == TaskStatus::Done).then(naive_date),
        archived: false,
        archived_at: None,
        created_by: Some(Uuid::new_v4()),
        updated_by: Uuid::new_v4(),
        created_at: naive_date(),
        updated_at: naive_date(),
    }
}

/// Mock primed with the four lookups every project-scoped handler makes:
/// organization, caller membership, project, project membership (none, so
/// the role derives from the organization role).
pub fn project_scope_mock(
    org: &organization::Model,
    caller: &user::Model,
    project: &project::Model,
    role: OrgRole,
) -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![org.clone()]])
        .append_query_results([vec![make_member(org.id, caller.id, role)]])
        .append_query_results([vec![project.clone()]])
        .append_query_results([Vec::<project_member::Model>::new()])
}

/// Pulls the mock statement log back out of a state that handlers are
/// done with.
pub fn transaction_log(state: Arc<ServerState>) -> String {
    let state = Arc::try_unwrap(state).ok().expect("state still shared");
    format!("{:?}", state.db.into_transaction_log())
}

/// The debug rendering of the single logged statement matching `needle`.
pub fn statement_with(log: &str, needle: &str) -> String {
    log.split("Statement {")
        .find(|chunk| chunk.contains(needle))
        .expect("statement not found in log")
        .to_string()
}
