/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for the membership fan-out helpers

extern crate core as trellis_core;

use entity::member::OrgRole;
use entity::{member, project_member};
use sea_orm::{DatabaseBackend, MockDatabase};
use trellis_core::database::{fan_out_task_members, sync_project_members};
use trellis_core::policy::project_role_for_org_role;
use uuid::Uuid;

fn make_member(organization: Uuid, role: OrgRole) -> member::Model {
    member::Model {
        id: Uuid::new_v4(),
        organization,
        user: Uuid::new_v4(),
        role,
    }
}

fn make_project_member(project: Uuid, user: Uuid, role: OrgRole) -> project_member::Model {
    project_member::Model {
        id: Uuid::new_v4(),
        project,
        user,
        role: project_role_for_org_role(role),
    }
}

#[test]
fn test_sync_project_members_maps_organization_roles() {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async {
            let org_id = Uuid::new_v4();
            let project_id = Uuid::new_v4();

            let creator = make_member(org_id, OrgRole::Owner);
            let regular = make_member(org_id, OrgRole::Member);
            let viewer = make_member(org_id, OrgRole::Viewer);

            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![creator.clone(), regular.clone(), viewer.clone()]])
                .append_query_results([Vec::<project_member::Model>::new()])
                .append_query_results([vec![project_member::Model {
                    id: Uuid::new_v4(),
                    project: project_id,
                    user: creator.user,
                    role: entity::project_member::ProjectRole::Owner,
                }]])
                .append_query_results([vec![make_project_member(
                    project_id,
                    regular.user,
                    OrgRole::Member,
                )]])
                .append_query_results([vec![make_project_member(
                    project_id,
                    viewer.user,
                    OrgRole::Viewer,
                )]])
                .into_connection();

            let added = sync_project_members(&db, org_id, project_id, Some(creator.user))
                .await
                .unwrap();

            assert_eq!(added, 3);

            // One row per organization member; the creator becomes project owner,
            // everyone else gets the mapped role.
            let log = format!("{:?}", db.into_transaction_log());
            assert_eq!(log.matches(r#"INSERT INTO "project_member""#).count(), 3);
            assert!(log.contains(r#"String(Some("owner"))"#));
            assert!(log.contains(r#"String(Some("editor"))"#));
            assert!(log.contains(r#"String(Some("viewer"))"#));
        })
}

#[test]
fn test_sync_project_members_skips_existing_rows() {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async {
            let org_id = Uuid::new_v4();
            let project_id = Uuid::new_v4();

            let present = make_member(org_id, OrgRole::Admin);
            let missing = make_member(org_id, OrgRole::Member);

            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![present.clone(), missing.clone()]])
                .append_query_results([vec![make_project_member(
                    project_id,
                    present.user,
                    OrgRole::Admin,
                )]])
                .append_query_results([vec![make_project_member(
                    project_id,
                    missing.user,
                    OrgRole::Member,
                )]])
                .into_connection();

            let added = sync_project_members(&db, org_id, project_id, None)
                .await
                .unwrap();

            assert_eq!(added, 1);

            let log = format!("{:?}", db.into_transaction_log());
            assert_eq!(log.matches(r#"INSERT INTO "project_member""#).count(), 1);
        })
}

#[test]
fn test_fan_out_task_members_maps_organization_roles() {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async {
            let org_id = Uuid::new_v4();
            let task_id = Uuid::new_v4();

            let owner = make_member(org_id, OrgRole::Owner);
            let viewer = make_member(org_id, OrgRole::Viewer);

            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![owner.clone(), viewer.clone()]])
                .append_query_results([vec![entity::task_member::Model {
                    id: Uuid::new_v4(),
                    task: task_id,
                    user: owner.user,
                    role: project_role_for_org_role(OrgRole::Owner),
                }]])
                .append_query_results([vec![entity::task_member::Model {
                    id: Uuid::new_v4(),
                    task: task_id,
                    user: viewer.user,
                    role: project_role_for_org_role(OrgRole::Viewer),
                }]])
                .into_connection();

            let added = fan_out_task_members(&db, org_id, task_id).await.unwrap();

            assert_eq!(added, 2);

            let log = format!("{:?}", db.into_transaction_log());
            assert_eq!(log.matches(r#"INSERT INTO "task_member""#).count(), 2);
            assert!(log.contains(r#"String(Some("admin"))"#));
            assert!(log.contains(r#"String(Some("viewer"))"#));
        })
}
