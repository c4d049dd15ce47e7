//! Application configuration schemas.
//!
//! All configuration structs are deserialized through the `config` crate from
//! `config/default.toml`, an optional environment overlay, and `BJDMS__*`
//! environment variables. Each sub-module represents one configuration
//! section.

pub mod app;
pub mod audit;
pub mod auth;
pub mod cache;
pub mod database;
pub mod logging;
pub mod rate_limit;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::audit::AuditConfig;
use self::auth::AuthConfig;
use self::cache::CacheConfig;
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use self::rate_limit::RateLimitConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session store backend settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Token, lockout, and session policy.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Audit pipeline settings.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Login rate limiting.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default.toml`, `config/{env}.toml` and environment
    /// variables prefixed with `BJDMS__` (e.g. `BJDMS__AUTH__ACCESS_SECRET`),
    /// then validates the result.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BJDMS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would weaken authentication.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;

        if self.audit.workers == 0 {
            return Err(AppError::configuration("audit.workers must be at least 1"));
        }
        if self.audit.queue_capacity == 0 {
            return Err(AppError::configuration(
                "audit.queue_capacity must be at least 1",
            ));
        }
        if self.rate_limit.login_limit == 0 || self.rate_limit.window_seconds == 0 {
            return Err(AppError::configuration(
                "rate_limit.login_limit and rate_limit.window_seconds must be positive",
            ));
        }
        match self.cache.provider.as_str() {
            "memory" | "redis" => Ok(()),
            other => Err(AppError::configuration(format!(
                "Unknown cache provider: '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.auth.access_ttl_minutes, 15);
        assert_eq!(config.auth.refresh_ttl_hours, 2160);
        assert_eq!(config.auth.max_failed_attempts, 5);
        assert_eq!(config.auth.lockout_duration_minutes, 30);
        assert_eq!(config.rate_limit.login_limit, 10);
    }

    #[test]
    fn identical_secrets_are_rejected() {
        let mut config = AppConfig::default();
        config.auth.refresh_secret = config.auth.access_secret.clone();
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn unknown_cache_provider_is_rejected() {
        let mut config = AppConfig::default();
        config.cache.provider = "layered".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_audit_workers_is_rejected() {
        let mut config = AppConfig::default();
        config.audit.workers = 0;
        assert!(config.validate().is_err());
    }
}
