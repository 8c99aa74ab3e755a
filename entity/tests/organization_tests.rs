/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for organization and membership entities

use chrono::NaiveDate;
use entity::*;
use sea_orm::{DatabaseBackend, MockDatabase, entity::prelude::*};
use uuid::Uuid;

#[tokio::test]
async fn test_organization_entity_basic() -> Result<(), DbErr> {
    let org_id = Uuid::new_v4();
    let naive_date = NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![organization::Model {
            id: org_id,
            name: "Acme Inc".to_owned(),
            slug: "k3j9x2m8q4wz".to_owned(),
            org_type: "team".to_owned(),
            plan: "free".to_owned(),
            created_at: naive_date,
            updated_at: naive_date,
        }]])
        .into_connection();

    let result = organization::Entity::find_by_id(org_id).one(&db).await?;

    assert!(result.is_some());
    let org = result.unwrap();
    assert_eq!(org.name, "Acme Inc");
    assert_eq!(org.slug, "k3j9x2m8q4wz");
    assert_eq!(org.plan, "free");

    Ok(())
}

#[tokio::test]
async fn test_member_roles() -> Result<(), DbErr> {
    let org_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            member::Model {
                id: Uuid::new_v4(),
                organization: org_id,
                user: Uuid::new_v4(),
                role: member::OrgRole::Owner,
            },
            member::Model {
                id: Uuid::new_v4(),
                organization: org_id,
                user: Uuid::new_v4(),
                role: member::OrgRole::Viewer,
            },
        ]])
        .into_connection();

    let members = member::Entity::find().all(&db).await?;

    assert_eq!(members.len(), 2);
    assert_eq!(
        members
            .iter()
            .filter(|m| m.role == member::OrgRole::Owner)
            .count(),
        1
    );

    Ok(())
}

#[tokio::test]
async fn test_invitation_entity_basic() -> Result<(), DbErr> {
    let invitation_id = Uuid::new_v4();
    let naive_date = NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![invitation::Model {
            id: invitation_id,
            organization: Uuid::new_v4(),
            email: "invitee@example.com".to_owned(),
            role: member::OrgRole::Member,
            status: invitation::InvitationStatus::Pending,
            invited_by: Some(Uuid::new_v4()),
            expires_at: naive_date + chrono::Duration::days(7),
            created_at: naive_date,
        }]])
        .into_connection();

    let result = invitation::Entity::find_by_id(invitation_id).one(&db).await?;

    assert!(result.is_some());
    let invitation = result.unwrap();
    assert_eq!(invitation.status, invitation::InvitationStatus::Pending);
    assert_eq!(invitation.role, member::OrgRole::Member);

    Ok(())
}
