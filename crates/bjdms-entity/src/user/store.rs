//! Credential store contract.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use bjdms_core::result::AppResult;

use super::model::{FailedAttemptOutcome, User};
use crate::jurisdiction::JurisdictionScope;

/// Persistent user identity, password hash, and lockout counters.
///
/// Soft-deleted users are invisible to every method.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Look a user up by login phone.
    async fn get_by_phone(&self, phone: &str) -> AppResult<Option<User>>;

    /// Atomically bump the failure counter and, when the new value reaches
    /// `max_attempts`, set `locked_until = now + lockout` in the same write.
    ///
    /// Returns `NotFound` when no row matched.
    async fn increment_failed_attempts(
        &self,
        phone: &str,
        max_attempts: i32,
        lockout: Duration,
    ) -> AppResult<FailedAttemptOutcome>;

    /// Zero the failure counter and clear `locked_until`.
    async fn reset_failed_attempts(&self, phone: &str) -> AppResult<()>;

    /// Jurisdiction and rank used for scope checks.
    ///
    /// Returns `NotFound` for an unknown or deleted user.
    async fn get_user_auth_details(&self, user_id: Uuid) -> AppResult<JurisdictionScope>;
}
