/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Shared authorization policy. Every handler goes through these tables
//! instead of comparing role enums inline.

use entity::member::OrgRole;
use entity::project_member::ProjectRole;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OrgAction {
    ManageOrg,
    CreateProject,
    ManageMembers,
    ChangeRoles,
    View,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProjectAction {
    ManageProject,
    EditTasks,
    ManageFiles,
    View,
}

pub fn org_allows(role: OrgRole, action: OrgAction) -> bool {
    match role {
        OrgRole::Owner | OrgRole::Admin => true,
        OrgRole::Member => matches!(action, OrgAction::CreateProject | OrgAction::View),
        OrgRole::Viewer => matches!(action, OrgAction::View),
    }
}

pub fn project_allows(role: ProjectRole, action: ProjectAction) -> bool {
    match role {
        ProjectRole::Owner | ProjectRole::Admin => true,
        ProjectRole::Editor => matches!(
            action,
            ProjectAction::EditTasks | ProjectAction::ManageFiles | ProjectAction::View
        ),
        ProjectRole::Viewer => matches!(action, ProjectAction::View),
    }
}

/// Role a user receives on a project or task derived from their
/// organization role.
pub fn project_role_for_org_role(role: OrgRole) -> ProjectRole {
    match role {
        OrgRole::Owner | OrgRole::Admin => ProjectRole::Admin,
        OrgRole::Member => ProjectRole::Editor,
        OrgRole::Viewer => ProjectRole::Viewer,
    }
}
