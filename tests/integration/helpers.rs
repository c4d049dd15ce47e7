//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use bjdms_api::{AppState, Stores, assemble_state, build_app};
use bjdms_auth::PasswordHasher;
use bjdms_auth::testing::InMemoryStores;
use bjdms_cache::provider::CacheManager;
use bjdms_core::config::AppConfig;
use bjdms_entity::jurisdiction::JurisdictionScope;
use bjdms_entity::user::User;

/// Phone of the user every [`TestApp`] starts with.
pub const PHONE: &str = "+8801700000000";
/// Password of every test user.
pub const PASSWORD: &str = "Secret123";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state behind the router
    pub state: AppState,
    /// In-memory stores behind the state
    pub stores: InMemoryStores,
    /// The seeded user
    pub user: User,
    password_hash: String,
}

impl TestApp {
    /// Create a test application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with the given configuration
    pub fn with_config(config: AppConfig) -> Self {
        let stores = InMemoryStores::default();
        let password_hash = PasswordHasher::new()
            .hash_password(PASSWORD)
            .expect("Failed to hash test password");
        let user = stores.credentials.insert_user(PHONE, &password_hash);

        let state = assemble_state(
            config,
            None,
            Arc::new(CacheManager::in_memory()),
            Stores {
                credentials: stores.credentials.clone(),
                hierarchy: stores.hierarchy.clone(),
                audit_sink: stores.audit.clone(),
            },
        );

        Self {
            router: build_app(state.clone()),
            state,
            stores,
            user,
            password_hash,
        }
    }

    /// Seed another active user with [`PASSWORD`]
    pub fn add_user(&self, phone: &str) -> User {
        self.stores
            .credentials
            .insert_user(phone, &self.password_hash)
    }

    /// Place a user in a jurisdiction with a rank
    pub fn assign(&self, user: &User, jurisdiction_id: Option<Uuid>, rank: i32) {
        self.stores.credentials.set_scope(
            user.id,
            JurisdictionScope {
                jurisdiction_id,
                rank,
            },
        );
    }

    /// Login and return the `data` object of the response
    pub async fn login(&self, phone: &str, password: &str) -> Value {
        let response = self
            .request(
                "POST",
                "/api/v1/auth/login",
                Some(serde_json::json!({ "phone": phone, "password": password })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.body["data"].clone()
    }

    /// Login as the seeded user and return the access token
    pub async fn access_token(&self) -> String {
        self.login(PHONE, PASSWORD).await["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("User-Agent", "bjdms-tests");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Wait until the audit sink has recorded `count` entries
    pub async fn audit_actions(&self, count: usize) -> Vec<String> {
        for _ in 0..100 {
            let actions = self.stores.audit.actions().await;
            if actions.len() >= count {
                return actions;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.stores.audit.actions().await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: axum::http::HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of an error envelope
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
