//! Application builder: wires stores, auth components, and the router into
//! a running server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::sync::watch;
use tracing::{error, info, warn};

use bjdms_auth::{
    AuditDispatcher, AuthGuard, AuthService, JwtDecoder, JwtEncoder, PasswordHasher, ScopeChecker,
    SessionStore,
};
use bjdms_cache::provider::CacheManager;
use bjdms_core::config::AppConfig;
use bjdms_core::error::AppError;
use bjdms_database::DatabasePool;
use bjdms_database::repositories::{
    audit::AuditLogRepository, jurisdiction::JurisdictionRepository, user::CredentialRepository,
};
use bjdms_entity::audit::AuditSink;
use bjdms_entity::jurisdiction::JurisdictionHierarchy;
use bjdms_entity::user::CredentialStore;

use crate::middleware::rate_limit::LoginRateLimiter;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Backing stores for the auth core.
#[derive(Clone)]
pub struct Stores {
    /// Credential and lockout store.
    pub credentials: Arc<dyn CredentialStore>,
    /// Jurisdiction tree.
    pub hierarchy: Arc<dyn JurisdictionHierarchy>,
    /// Audit log destination.
    pub audit_sink: Arc<dyn AuditSink>,
}

impl Stores {
    /// Postgres implementations sharing one pool.
    pub fn postgres(database: &DatabasePool) -> Self {
        let pool = database.pool().clone();
        Self {
            credentials: Arc::new(CredentialRepository::new(pool.clone())),
            hierarchy: Arc::new(JurisdictionRepository::new(pool.clone())),
            audit_sink: Arc::new(AuditLogRepository::new(pool)),
        }
    }
}

/// Wire the auth components over the given stores.
///
/// Starts the audit workers, so call from inside a Tokio runtime.
pub fn assemble_state(
    config: AppConfig,
    database: Option<DatabasePool>,
    cache: Arc<CacheManager>,
    stores: Stores,
) -> AppState {
    let auth = &config.auth;

    let encoder = Arc::new(JwtEncoder::new(auth));
    let decoder = Arc::new(JwtDecoder::new(auth));
    let sessions = Arc::new(SessionStore::new(Arc::clone(&cache), auth.store_timeout()));
    let hasher = Arc::new(PasswordHasher::new());
    let audit = Arc::new(AuditDispatcher::start(stores.audit_sink, &config.audit));

    let auth_service = Arc::new(AuthService::new(
        auth,
        encoder,
        Arc::clone(&decoder),
        Arc::clone(&sessions),
        hasher,
        Arc::clone(&stores.credentials),
        Arc::clone(&audit),
    ));
    let guard = Arc::new(AuthGuard::new(decoder, sessions));
    let scope = Arc::new(ScopeChecker::new(
        stores.credentials,
        stores.hierarchy,
        auth.store_timeout(),
    ));
    let login_limiter = Arc::new(LoginRateLimiter::new(&config.rate_limit));

    AppState {
        config: Arc::new(config),
        database,
        cache,
        auth_service,
        guard,
        scope,
        audit,
        login_limiter,
    }
}

/// Runs the BJDMS server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting BJDMS auth server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    info!("Connecting to database...");
    let database = DatabasePool::connect(&config.database).await?;
    if config.database.run_migrations {
        info!("Running database migrations...");
        bjdms_database::migration::run_migrations(database.pool()).await?;
    }

    // ── Step 2: Initialize session store backend ─────────────────
    info!(provider = %config.cache.provider, "Initializing session store...");
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Step 3: Wire auth components ─────────────────────────────
    let stores = Stores::postgres(&database);
    let state = assemble_state(config.clone(), Some(database.clone()), cache, stores);
    let audit = Arc::clone(&state.audit);

    // ── Step 4: Background tasks ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = LoginRateLimiter::spawn_sweeper(
        Arc::clone(&state.login_limiter),
        config.rate_limit.sweep_interval(),
        shutdown_rx,
    );

    // ── Step 5: Build and start HTTP server ──────────────────────
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("BJDMS server listening on {}", addr);

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    let served = server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")));

    // ── Step 6: Drain background tasks ───────────────────────────
    info!("Draining audit queue...");
    audit.shutdown().await;
    if let Err(e) = sweeper.await {
        warn!(error = %e, "Rate limit sweeper ended abnormally");
    }
    database.close().await;

    info!("BJDMS server shut down gracefully");
    served
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
