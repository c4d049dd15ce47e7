//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use bjdms_auth::{AuditDispatcher, AuthGuard, AuthService, ScopeChecker};
use bjdms_cache::provider::CacheManager;
use bjdms_core::config::AppConfig;
use bjdms_database::DatabasePool;

use crate::middleware::rate_limit::LoginRateLimiter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool, absent when running on in-memory stores
    pub database: Option<DatabasePool>,
    /// Session store backend (Redis or in-memory)
    pub cache: Arc<CacheManager>,

    // ── Auth ─────────────────────────────────────────────────
    /// Login, refresh, and logout flows
    pub auth_service: Arc<AuthService>,
    /// Per-request bearer token gate
    pub guard: Arc<AuthGuard>,
    /// Jurisdiction scope checks
    pub scope: Arc<ScopeChecker>,
    /// Audit event pipeline
    pub audit: Arc<AuditDispatcher>,
    /// Login throttling by client address
    pub login_limiter: Arc<LoginRateLimiter>,
}
