/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use migration::Migrator;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection, EntityTrait, QueryFilter,
};
use sea_orm_migration::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::log::LevelFilter;
use uuid::Uuid;

use super::policy::project_role_for_org_role;
use super::types::*;
use entity::member::OrgRole;
use entity::project_member::ProjectRole;

pub async fn connect_db(cli: &Cli) -> Result<DatabaseConnection> {
    let db_url = if let Some(file) = &cli.database_url_file {
        std::fs::read_to_string(file).context("Failed to read database url from file")?
    } else if let Some(url) = &cli.database_url {
        url.clone()
    } else {
        anyhow::bail!("No database url provided")
    };

    let mut opt = ConnectOptions::new(db_url.trim().to_string());

    // Only enable SQL logging at debug level
    if cli.log_level == "debug" {
        opt.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);
    } else {
        opt.sqlx_logging(false);
    }

    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8));

    let db = Database::connect(opt)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;
    Ok(db)
}

/// Project resolved together with everything a handler needs to
/// authorize against it.
#[derive(Debug, Clone)]
pub struct ProjectScope {
    pub organization: MOrganization,
    pub member: MMember,
    pub project: MProject,
    pub project_member: Option<MProjectMember>,
}

impl ProjectScope {
    /// Project role the requesting user acts with. Members without a
    /// project_member row yet fall back to the role derived from their
    /// organization role.
    pub fn effective_role(&self) -> ProjectRole {
        self.project_member
            .as_ref()
            .map(|pm| pm.role)
            .unwrap_or_else(|| project_role_for_org_role(self.member.role))
    }
}

/// Resolves an organization by slug, scoped to the requesting user's
/// membership. Organizations the user is not a member of read as absent.
pub async fn get_organization_by_slug(
    state: Arc<ServerState>,
    user_id: Uuid,
    slug: &str,
) -> Result<Option<(MOrganization, MMember)>> {
    let organization = EOrganization::find()
        .filter(COrganization::Slug.eq(slug))
        .one(&state.db)
        .await
        .context("Failed to query organization")?;

    let Some(organization) = organization else {
        return Ok(None);
    };

    let member = EMember::find()
        .filter(
            Condition::all()
                .add(CMember::Organization.eq(organization.id))
                .add(CMember::User.eq(user_id)),
        )
        .one(&state.db)
        .await
        .context("Failed to query membership")?;

    Ok(member.map(|m| (organization, m)))
}

pub async fn get_project_by_slug(
    state: Arc<ServerState>,
    user_id: Uuid,
    organization_slug: &str,
    project_slug: &str,
) -> Result<Option<ProjectScope>> {
    let Some((organization, member)) =
        get_organization_by_slug(state.clone(), user_id, organization_slug).await?
    else {
        return Ok(None);
    };

    let project = EProject::find()
        .filter(
            Condition::all()
                .add(CProject::Organization.eq(organization.id))
                .add(CProject::Slug.eq(project_slug)),
        )
        .one(&state.db)
        .await
        .context("Failed to query project")?;

    let Some(project) = project else {
        return Ok(None);
    };

    let project_member = EProjectMember::find()
        .filter(
            Condition::all()
                .add(CProjectMember::Project.eq(project.id))
                .add(CProjectMember::User.eq(user_id)),
        )
        .one(&state.db)
        .await
        .context("Failed to query project membership")?;

    Ok(Some(ProjectScope {
        organization,
        member,
        project,
        project_member,
    }))
}

/// Adds a project_member row for every organization member that does not
/// have one yet, with the role derived from the organization role. The
/// project creator, when given, becomes project owner. Existing rows are
/// never downgraded. Returns the number of rows added.
pub async fn sync_project_members<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    project_id: Uuid,
    creator: Option<Uuid>,
) -> Result<u64> {
    let members = EMember::find()
        .filter(CMember::Organization.eq(organization_id))
        .all(db)
        .await
        .context("Failed to query organization members")?;

    let existing = EProjectMember::find()
        .filter(CProjectMember::Project.eq(project_id))
        .all(db)
        .await
        .context("Failed to query project members")?;

    let mut added = 0;

    for member in members {
        if existing.iter().any(|pm| pm.user == member.user) {
            continue;
        }

        let role = if creator == Some(member.user) {
            ProjectRole::Owner
        } else {
            project_role_for_org_role(member.role)
        };

        let aproject_member = AProjectMember {
            id: Set(Uuid::new_v4()),
            project: Set(project_id),
            user: Set(member.user),
            role: Set(role),
        };

        aproject_member
            .insert(db)
            .await
            .context("Failed to insert project member")?;
        added += 1;
    }

    Ok(added)
}

/// Fans task_member rows out of the organization membership at task
/// creation, with the same role mapping as project members.
pub async fn fan_out_task_members<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    task_id: Uuid,
) -> Result<u64> {
    let members = EMember::find()
        .filter(CMember::Organization.eq(organization_id))
        .all(db)
        .await
        .context("Failed to query organization members")?;

    let mut added = 0;

    for member in members {
        let atask_member = ATaskMember {
            id: Set(Uuid::new_v4()),
            task: Set(task_id),
            user: Set(member.user),
            role: Set(project_role_for_org_role(member.role)),
        };

        atask_member
            .insert(db)
            .await
            .context("Failed to insert task member")?;
        added += 1;
    }

    Ok(added)
}

pub async fn user_owns_any_organization(
    state: Arc<ServerState>,
    user_id: Uuid,
) -> Result<bool> {
    let owned = EMember::find()
        .filter(
            Condition::all()
                .add(CMember::User.eq(user_id))
                .add(CMember::Role.eq(OrgRole::Owner)),
        )
        .one(&state.db)
        .await
        .context("Failed to query owned organizations")?;

    Ok(owned.is_some())
}
