/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for the authorization decision tables

extern crate core as trellis_core;
use entity::member::OrgRole;
use entity::project_member::ProjectRole;
use trellis_core::policy::*;

#[test]
fn test_org_owner_and_admin_allow_everything() {
    for role in [OrgRole::Owner, OrgRole::Admin] {
        for action in [
            OrgAction::ManageOrg,
            OrgAction::CreateProject,
            OrgAction::ManageMembers,
            OrgAction::ChangeRoles,
            OrgAction::View,
        ] {
            assert!(org_allows(role, action));
        }
    }
}

#[test]
fn test_org_member_can_create_projects_but_not_manage() {
    assert!(org_allows(OrgRole::Member, OrgAction::CreateProject));
    assert!(org_allows(OrgRole::Member, OrgAction::View));

    assert!(!org_allows(OrgRole::Member, OrgAction::ManageOrg));
    assert!(!org_allows(OrgRole::Member, OrgAction::ManageMembers));
    assert!(!org_allows(OrgRole::Member, OrgAction::ChangeRoles));
}

#[test]
fn test_org_viewer_is_read_only() {
    assert!(org_allows(OrgRole::Viewer, OrgAction::View));

    assert!(!org_allows(OrgRole::Viewer, OrgAction::CreateProject));
    assert!(!org_allows(OrgRole::Viewer, OrgAction::ManageOrg));
    assert!(!org_allows(OrgRole::Viewer, OrgAction::ManageMembers));
}

#[test]
fn test_project_editor_edits_but_does_not_manage() {
    assert!(project_allows(ProjectRole::Editor, ProjectAction::EditTasks));
    assert!(project_allows(
        ProjectRole::Editor,
        ProjectAction::ManageFiles
    ));
    assert!(project_allows(ProjectRole::Editor, ProjectAction::View));

    assert!(!project_allows(
        ProjectRole::Editor,
        ProjectAction::ManageProject
    ));
}

#[test]
fn test_project_viewer_is_read_only() {
    assert!(project_allows(ProjectRole::Viewer, ProjectAction::View));

    assert!(!project_allows(
        ProjectRole::Viewer,
        ProjectAction::EditTasks
    ));
    assert!(!project_allows(
        ProjectRole::Viewer,
        ProjectAction::ManageFiles
    ));
}

#[test]
fn test_project_role_derivation() {
    assert_eq!(project_role_for_org_role(OrgRole::Owner), ProjectRole::Admin);
    assert_eq!(project_role_for_org_role(OrgRole::Admin), ProjectRole::Admin);
    assert_eq!(
        project_role_for_org_role(OrgRole::Member),
        ProjectRole::Editor
    );
    assert_eq!(
        project_role_for_org_role(OrgRole::Viewer),
        ProjectRole::Viewer
    );
}
