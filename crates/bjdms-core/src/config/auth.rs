//! Authentication configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Token, lockout, and session policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret for access tokens.
    #[serde(default = "default_access_secret")]
    pub access_secret: String,
    /// HMAC-SHA256 secret for refresh tokens. Must differ from `access_secret`.
    #[serde(default = "default_refresh_secret")]
    pub refresh_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_hours: u64,
    /// Consecutive failed logins before lockout.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: i32,
    /// Account lockout duration in minutes.
    #[serde(default = "default_lockout")]
    pub lockout_duration_minutes: u64,
    /// Accepted for compatibility; not enforced.
    #[serde(default)]
    pub max_concurrent_sessions: Option<u32>,
    /// Require a live, unrevoked session for the refresh token on `/auth/refresh`.
    #[serde(default)]
    pub refresh_requires_live_session: bool,
    /// Write a revocation marker for the access token on logout.
    #[serde(default = "default_true")]
    pub revoke_on_logout: bool,
    /// Deadline for a single credential or session store call, in milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
}

impl AuthConfig {
    /// Access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_ttl_minutes * 60)
    }

    /// Refresh token lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl_hours * 3600)
    }

    /// How long an account stays locked once the threshold is hit.
    pub fn lockout_duration(&self) -> Duration {
        Duration::from_secs(self.lockout_duration_minutes * 60)
    }

    /// Deadline for one store round-trip.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Whether the secrets are still the shipped placeholders.
    pub fn uses_placeholder_secrets(&self) -> bool {
        self.access_secret.starts_with("CHANGE_ME") || self.refresh_secret.starts_with("CHANGE_ME")
    }

    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            return Err(AppError::configuration(
                "auth.access_secret and auth.refresh_secret must be set",
            ));
        }
        if self.access_secret == self.refresh_secret {
            return Err(AppError::configuration(
                "auth.access_secret and auth.refresh_secret must differ",
            ));
        }
        if self.max_failed_attempts < 1 {
            return Err(AppError::configuration(
                "auth.max_failed_attempts must be at least 1",
            ));
        }
        if self.access_ttl_minutes == 0 || self.refresh_ttl_hours == 0 {
            return Err(AppError::configuration("token lifetimes must be positive"));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: default_access_secret(),
            refresh_secret: default_refresh_secret(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_hours: default_refresh_ttl(),
            max_failed_attempts: default_max_failed(),
            lockout_duration_minutes: default_lockout(),
            max_concurrent_sessions: None,
            refresh_requires_live_session: false,
            revoke_on_logout: default_true(),
            store_timeout_ms: default_store_timeout(),
        }
    }
}

fn default_access_secret() -> String {
    "CHANGE_ME_ACCESS_SECRET".to_string()
}

fn default_refresh_secret() -> String {
    "CHANGE_ME_REFRESH_SECRET".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    2160
}

fn default_max_failed() -> i32 {
    5
}

fn default_lockout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_store_timeout() -> u64 {
    2000
}
