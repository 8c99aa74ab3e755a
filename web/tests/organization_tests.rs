/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

mod common;

use entity::member::OrgRole;
use web::endpoints::invitations::MakeInvitationRequest;
use web::endpoints::members::PatchMemberRequest;
use web::endpoints::orgs::{
    DeleteOrganizationRequest, MakeOrganizationRequest, PatchOrganizationRequest,
};

#[test]
fn test_make_organization_request_serialization() {
    let request = MakeOrganizationRequest {
        name: "Acme Inc".to_string(),
        org_type: Some("company".to_string()),
        plan: None,
    };

    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains("Acme Inc"));
    assert!(json.contains("company"));
}

#[test]
fn test_make_organization_request_defaults() {
    let request: MakeOrganizationRequest =
        serde_json::from_str(r#"{"name": "Acme Inc"}"#).unwrap();

    assert_eq!(request.name, "Acme Inc");
    assert!(request.org_type.is_none());
    assert!(request.plan.is_none());
}

#[test]
fn test_patch_organization_request_partial() {
    let request: PatchOrganizationRequest =
        serde_json::from_str(r#"{"plan": "pro"}"#).unwrap();

    assert!(request.name.is_none());
    assert!(request.org_type.is_none());
    assert_eq!(request.plan.as_deref(), Some("pro"));
}

#[test]
fn test_delete_organization_request_requires_confirmation() {
    let request: DeleteOrganizationRequest =
        serde_json::from_str(r#"{"confirm_name": "Acme Inc"}"#).unwrap();
    assert_eq!(request.confirm_name, "Acme Inc");

    assert!(serde_json::from_str::<DeleteOrganizationRequest>("{}").is_err());
}

#[test]
fn test_patch_member_request_role_format() {
    let request: PatchMemberRequest = serde_json::from_str(r#"{"role": "admin"}"#).unwrap();
    assert_eq!(request.role, OrgRole::Admin);

    assert!(serde_json::from_str::<PatchMemberRequest>(r#"{"role": "boss"}"#).is_err());
}

#[test]
fn test_make_invitation_request_serialization() {
    let request = MakeInvitationRequest {
        email: "invitee@example.com".to_string(),
        role: OrgRole::Member,
    };

    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains("invitee@example.com"));
    assert!(json.contains("\"member\""));
}
