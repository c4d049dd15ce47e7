//! Route definitions for the BJDMS HTTP API.
//!
//! All routes are mounted under `/api/v1`. Login is throttled per client and
//! scoped routes check the target jurisdiction before the handler runs.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;

    let api_routes = Router::new()
        .merge(auth_routes(&state))
        .merge(admin_routes())
        .merge(jurisdiction_routes(&state))
        .merge(health_routes());

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(DefaultBodyLimit::max(server.body_limit_bytes))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&server.cors))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: login, refresh, logout, session, logout-all
fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/auth/login",
            post(handlers::auth::login).route_layer(axum_middleware::from_fn_with_state(
                state.clone(),
                middleware::rate_limit::login_rate_limit,
            )),
        )
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/session", get(handlers::auth::session))
        .route("/auth/logout-all", post(handlers::auth::logout_all))
}

/// Central authority session control
fn admin_routes() -> Router<AppState> {
    Router::new().route(
        "/admin/users/{user_id}/sessions",
        delete(handlers::admin::revoke_user_sessions),
    )
}

/// Jurisdiction-scoped endpoints
fn jurisdiction_routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/jurisdictions/access",
        get(handlers::jurisdiction::access).route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::jurisdiction::require_jurisdiction_scope,
        )),
    )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
