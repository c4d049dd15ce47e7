//! Failed-login counting and account lockout.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, warn};

use bjdms_core::config::auth::AuthConfig;
use bjdms_entity::user::{CredentialStore, FailedAttemptOutcome, User, mask_phone};

use crate::deadline::with_deadline;

/// Applies the lockout policy on top of the credential store.
///
/// Counter writes are best-effort: a failed write is logged and the login
/// outcome is unchanged.
#[derive(Clone)]
pub struct LockoutPolicy {
    credentials: Arc<dyn CredentialStore>,
    max_attempts: i32,
    lockout_duration: Duration,
    timeout: Duration,
}

impl std::fmt::Debug for LockoutPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockoutPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("lockout_duration", &self.lockout_duration)
            .finish_non_exhaustive()
    }
}

impl LockoutPolicy {
    /// Creates a lockout policy from auth configuration.
    pub fn new(credentials: Arc<dyn CredentialStore>, config: &AuthConfig) -> Self {
        Self {
            credentials,
            max_attempts: config.max_failed_attempts,
            lockout_duration: config.lockout_duration(),
            timeout: config.store_timeout(),
        }
    }

    /// Consecutive failures that trigger a lock.
    pub fn max_attempts(&self) -> i32 {
        self.max_attempts
    }

    /// Whether `user` is inside an open lockout window at `now`.
    pub fn is_locked(&self, user: &User, now: DateTime<Utc>) -> bool {
        user.is_locked_at(now)
    }

    /// Count a wrong password. Returns the new counter state when the write
    /// succeeded.
    pub async fn record_failure(&self, phone: &str) -> Option<FailedAttemptOutcome> {
        let result = with_deadline(
            self.timeout,
            "failed attempt increment",
            self.credentials.increment_failed_attempts(
                phone,
                self.max_attempts,
                self.lockout_duration,
            ),
        )
        .await;

        match result {
            Ok(outcome) => {
                if outcome.failed_login_attempts >= self.max_attempts {
                    warn!(
                        phone = %mask_phone(phone),
                        attempts = outcome.failed_login_attempts,
                        locked_until = ?outcome.locked_until,
                        "Account locked after repeated failures"
                    );
                }
                Some(outcome)
            }
            Err(e) => {
                error!(phone = %mask_phone(phone), error = %e, "Failed to record failed login");
                None
            }
        }
    }

    /// Clear the counter after a successful login.
    pub async fn record_success(&self, phone: &str) {
        let result = with_deadline(
            self.timeout,
            "failed attempt reset",
            self.credentials.reset_failed_attempts(phone),
        )
        .await;

        if let Err(e) = result {
            error!(phone = %mask_phone(phone), error = %e, "Failed to reset failed logins");
        }
    }
}
