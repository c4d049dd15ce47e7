//! Integration tests for jurisdiction-scoped access.

mod helpers;

use axum::http::StatusCode;
use helpers::TestApp;
use uuid::Uuid;

/// Division ─┬─ District A ── Upazila
///           └─ District B
struct Tree {
    division: Uuid,
    district_a: Uuid,
    district_b: Uuid,
    upazila: Uuid,
}

fn seed_tree(app: &TestApp) -> Tree {
    let tree = Tree {
        division: Uuid::new_v4(),
        district_a: Uuid::new_v4(),
        district_b: Uuid::new_v4(),
        upazila: Uuid::new_v4(),
    };
    let hierarchy = &app.stores.hierarchy;
    hierarchy.insert(tree.division, None);
    hierarchy.insert(tree.district_a, Some(tree.division));
    hierarchy.insert(tree.district_b, Some(tree.division));
    hierarchy.insert(tree.upazila, Some(tree.district_a));
    tree
}

async fn check_access(app: &TestApp, token: &str, target: &str) -> helpers::TestResponse {
    app.request(
        "GET",
        &format!("/api/v1/jurisdictions/access?jurisdiction_id={target}"),
        None,
        Some(token),
    )
    .await
}

#[tokio::test]
async fn district_officer_reaches_own_subtree() {
    let app = TestApp::new();
    let tree = seed_tree(&app);
    app.assign(&app.user, Some(tree.district_a), 5);
    let token = app.access_token().await;

    for target in [tree.district_a, tree.upazila] {
        let response = check_access(&app, &token, &target.to_string()).await;
        assert_eq!(response.status, StatusCode::OK, "{target}");
        assert_eq!(response.body["data"]["in_scope"], true);
        assert_eq!(response.body["data"]["jurisdiction_id"], target.to_string());
    }
}

#[tokio::test]
async fn district_officer_cannot_reach_sibling_or_parent() {
    let app = TestApp::new();
    let tree = seed_tree(&app);
    app.assign(&app.user, Some(tree.district_a), 5);
    let token = app.access_token().await;

    for target in [tree.district_b, tree.division] {
        let response = check_access(&app, &token, &target.to_string()).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{target}");
        assert_eq!(
            response.body["message"],
            "Access denied: Target jurisdiction is outside your area of responsibility"
        );
    }
}

#[tokio::test]
async fn central_authority_reaches_everything() {
    let app = TestApp::new();
    let tree = seed_tree(&app);
    app.assign(&app.user, Some(tree.district_a), 1);
    let token = app.access_token().await;

    let response = check_access(&app, &token, &tree.district_b.to_string()).await;
    assert_eq!(response.status, StatusCode::OK);

    let unknown = check_access(&app, &token, &Uuid::new_v4().to_string()).await;
    assert_eq!(unknown.status, StatusCode::OK);
}

#[tokio::test]
async fn member_without_committee_is_refused() {
    let app = TestApp::new();
    let tree = seed_tree(&app);
    let token = app.access_token().await;

    let response = check_access(&app, &token, &tree.upazila.to_string()).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.body["message"],
        "You must be part of a committee to manage organizational units"
    );
}

#[tokio::test]
async fn malformed_target_is_a_validation_error() {
    let app = TestApp::new();
    app.assign(&app.user, Some(Uuid::new_v4()), 5);
    let token = app.access_token().await;

    let response = check_access(&app, &token, "district-a").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid target jurisdiction ID");
}

#[tokio::test]
async fn repeated_target_parameter_is_rejected() {
    let app = TestApp::new();
    let tree = seed_tree(&app);
    app.assign(&app.user, Some(tree.district_a), 5);
    let token = app.access_token().await;

    let response = app
        .request(
            "GET",
            &format!(
                "/api/v1/jurisdictions/access?jurisdiction_id={0}&jurisdiction_id={0}",
                tree.district_b
            ),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
    assert!(response.body["data"].is_null());
}

#[tokio::test]
async fn unrelated_parameters_do_not_hide_the_target() {
    let app = TestApp::new();
    let tree = seed_tree(&app);
    app.assign(&app.user, Some(tree.district_a), 5);
    let token = app.access_token().await;

    let response = app
        .request(
            "GET",
            &format!(
                "/api/v1/jurisdictions/access?page=2&jurisdiction_id={}",
                tree.district_b
            ),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn no_target_passes_through() {
    let app = TestApp::new();
    let token = app.access_token().await;

    let response = app
        .request("GET", "/api/v1/jurisdictions/access", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"]["jurisdiction_id"].is_null());
}

#[tokio::test]
async fn scope_check_requires_authentication() {
    let app = TestApp::new();
    let tree = seed_tree(&app);

    let response = app
        .request(
            "GET",
            &format!(
                "/api/v1/jurisdictions/access?jurisdiction_id={}",
                tree.upazila
            ),
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
