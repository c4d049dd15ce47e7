//! Integration tests for the login, refresh, and logout flows.

mod helpers;

use axum::http::StatusCode;
use helpers::{PASSWORD, PHONE, TestApp};

#[tokio::test]
async fn login_returns_tokens_and_profile() {
    let app = TestApp::new();

    let data = app.login(PHONE, PASSWORD).await;

    assert!(data["access_token"].as_str().is_some());
    assert!(data["refresh_token"].as_str().is_some());
    assert_eq!(data["expires_in"], 900);
    assert_eq!(data["user"]["id"], app.user.id.to_string());
    assert_eq!(data["user"]["phone"], "+88017***0000");
    assert!(data["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(serde_json::json!({ "phone": PHONE, "password": "nope" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_CREDENTIALS");
    assert_eq!(app.stores.credentials.user(PHONE).unwrap().failed_login_attempts, 1);
}

#[tokio::test]
async fn unknown_phone_looks_like_wrong_password() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(serde_json::json!({ "phone": "+8801999999999", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn badly_formed_phone_is_rejected_before_lookup() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(serde_json::json!({ "phone": "01700000000", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn five_failures_lock_the_account() {
    let app = TestApp::new();
    let wrong = serde_json::json!({ "phone": PHONE, "password": "wrong-password" });

    for _ in 0..5 {
        let response = app
            .request("POST", "/api/v1/auth/login", Some(wrong.clone()), None)
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    let response = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(serde_json::json!({ "phone": PHONE, "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::LOCKED);
    assert_eq!(response.error_code(), "ACCOUNT_LOCKED");
}

#[tokio::test]
async fn successful_login_resets_the_counter() {
    let app = TestApp::new();
    app.stores
        .credentials
        .update(PHONE, |u| u.failed_login_attempts = 3);

    app.login(PHONE, PASSWORD).await;

    assert_eq!(app.stores.credentials.user(PHONE).unwrap().failed_login_attempts, 0);
}

#[tokio::test]
async fn inactive_account_is_forbidden() {
    let app = TestApp::new();
    app.stores.credentials.update(PHONE, |u| u.is_active = false);

    let response = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(serde_json::json!({ "phone": PHONE, "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "ACCOUNT_INACTIVE");
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let app = TestApp::new();

    let missing = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(serde_json::json!({ "phone": PHONE })),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.error_code(), "VALIDATION_ERROR");

    let empty = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(serde_json::json!({ "phone": PHONE, "password": "" })),
            None,
        )
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.body["message"], "Password is required");
}

#[tokio::test]
async fn refresh_mints_a_new_access_token() {
    let app = TestApp::new();
    let data = app.login(PHONE, PASSWORD).await;
    let refresh_token = data["refresh_token"].as_str().unwrap();

    let response = app
        .request(
            "POST",
            "/api/v1/auth/refresh",
            Some(serde_json::json!({ "refresh_token": refresh_token })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let access = response.body["data"]["access_token"].as_str().unwrap();
    assert_ne!(access, data["access_token"].as_str().unwrap());
    assert_eq!(response.body["data"]["refresh_token"], refresh_token);

    let session = app
        .request("GET", "/api/v1/auth/session", None, Some(access))
        .await;
    assert_eq!(session.status, StatusCode::OK);
}

#[tokio::test]
async fn access_token_cannot_refresh() {
    let app = TestApp::new();
    let token = app.access_token().await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/refresh",
            Some(serde_json::json!({ "refresh_token": token })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_TOKEN");
}

#[tokio::test]
async fn logout_kills_the_access_token() {
    let app = TestApp::new();
    let token = app.access_token().await;

    let response = app
        .request("POST", "/api/v1/auth/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Logged out successfully");

    let after = app
        .request("GET", "/api/v1/auth/session", None, Some(&token))
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.error_code(), "SESSION_INACTIVE");
}

#[tokio::test]
async fn logout_always_succeeds() {
    let app = TestApp::new();

    let anonymous = app.request("POST", "/api/v1/auth/logout", None, None).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert_eq!(anonymous.body["message"], "Logged out (no session found)");

    let garbage = app
        .request("POST", "/api/v1/auth/logout", None, Some("garbage"))
        .await;
    assert_eq!(garbage.status, StatusCode::OK);
    assert_eq!(garbage.body["message"], "Logged out (invalid token)");
}

#[tokio::test]
async fn logout_all_ends_every_session() {
    let app = TestApp::new();
    let first = app.access_token().await;
    let second = app.access_token().await;

    let response = app
        .request("POST", "/api/v1/auth/logout-all", None, Some(&second))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_id"], app.user.id.to_string());

    for token in [&first, &second] {
        let after = app
            .request("GET", "/api/v1/auth/session", None, Some(token))
            .await;
        assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn login_and_logout_are_audited() {
    let app = TestApp::new();
    let token = app.access_token().await;
    app.request("POST", "/api/v1/auth/logout", None, Some(&token))
        .await;

    let actions = app.audit_actions(2).await;
    assert!(actions.contains(&"login_success".to_string()));
    assert!(actions.contains(&"logout".to_string()));

    let entries = app.stores.audit.entries().await;
    assert!(
        entries
            .iter()
            .all(|e| e.user_agent.as_deref() == Some("bjdms-tests"))
    );
}

#[tokio::test]
async fn health_reports_dependencies() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/v1/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "not_configured");
    assert_eq!(response.body["data"]["cache"]["healthy"], true);
    assert_eq!(response.body["data"]["audit_events_dropped"], 0);
}
