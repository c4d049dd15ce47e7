//! BJDMS auth server
//!
//! Loads configuration, initializes logging, and runs the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use bjdms_core::config::AppConfig;

#[tokio::main]
async fn main() {
    let env = std::env::var("BJDMS_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");
    warn_on_risky_settings(&config);

    if let Err(e) = bjdms_api::run_server(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

fn warn_on_risky_settings(config: &AppConfig) {
    if config.auth.uses_placeholder_secrets() {
        tracing::warn!(
            "Token secrets are the built-in placeholders; \
             set BJDMS__AUTH__ACCESS_SECRET and BJDMS__AUTH__REFRESH_SECRET"
        );
    }
    if let Some(limit) = config.auth.max_concurrent_sessions {
        tracing::warn!(
            limit,
            "auth.max_concurrent_sessions is set but not enforced; sessions are unlimited"
        );
    }
    if config.server.cors.allowed_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS allows any origin");
    }
}
