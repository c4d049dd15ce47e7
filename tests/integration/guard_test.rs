//! Integration tests for bearer token admission on protected routes.

mod helpers;

use axum::http::StatusCode;
use helpers::{PASSWORD, PHONE, TestApp};

use bjdms_auth::JwtEncoder;
use bjdms_core::config::auth::AuthConfig;

#[tokio::test]
async fn missing_header_is_rejected() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/v1/auth/session", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_TOKEN");
    assert_eq!(response.body["message"], "Missing authorization header");
}

#[tokio::test]
async fn session_reports_the_caller() {
    let app = TestApp::new();
    let token = app.access_token().await;

    let response = app
        .request("GET", "/api/v1/auth/session", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_id"], app.user.id.to_string());
    assert!(response.body["data"]["token_id"].as_str().is_some());
    assert!(response.body["data"]["expires_at"].as_str().is_some());
}

#[tokio::test]
async fn refresh_token_is_not_an_access_token() {
    let app = TestApp::new();
    let data = app.login(PHONE, PASSWORD).await;
    let refresh = data["refresh_token"].as_str().unwrap();

    let response = app
        .request("GET", "/api/v1/auth/session", None, Some(refresh))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_TOKEN");
}

#[tokio::test]
async fn foreign_signature_is_rejected() {
    let app = TestApp::new();
    let foreign = JwtEncoder::new(&AuthConfig {
        access_secret: "some-other-deployment-secret".to_string(),
        ..AuthConfig::default()
    });
    let issued = foreign
        .issue_access_token(app.user.id, PHONE, false)
        .unwrap();

    let response = app
        .request("GET", "/api/v1/auth/session", None, Some(&issued.token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_TOKEN");
}

#[tokio::test]
async fn valid_token_without_session_is_inactive() {
    let app = TestApp::new();
    let issued = JwtEncoder::new(&AuthConfig::default())
        .issue_access_token(app.user.id, PHONE, false)
        .unwrap();

    let response = app
        .request("GET", "/api/v1/auth/session", None, Some(&issued.token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "SESSION_INACTIVE");
}

#[tokio::test]
async fn central_authority_can_force_logout() {
    let app = TestApp::new();
    let member = app.add_user("+8801811111111");
    let member_token = app.login("+8801811111111", PASSWORD).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    app.assign(&app.user, None, 1);
    let admin_token = app.access_token().await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/v1/admin/users/{}/sessions", member.id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_id"], member.id.to_string());

    let after = app
        .request("GET", "/api/v1/auth/session", None, Some(&member_token))
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.error_code(), "SESSION_INACTIVE");

    let actions = app.audit_actions(3).await;
    assert!(actions.contains(&"sessions_revoked".to_string()));
}

#[tokio::test]
async fn force_logout_needs_rank_one() {
    let app = TestApp::new();
    let member = app.add_user("+8801811111111");
    app.assign(&app.user, Some(uuid::Uuid::new_v4()), 5);
    let token = app.access_token().await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/v1/admin/users/{}/sessions", member.id),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FORBIDDEN");
}
