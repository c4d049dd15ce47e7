//! Session store over the expiring cache.
//!
//! A session is the key `session:{user_id}:{token_id}` holding `active`, with
//! a TTL equal to the token lifetime. A revocation marker is
//! `revoked:{token_id}`. Absence of a key is an answer, not an error.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use uuid::Uuid;

use bjdms_cache::keys;
use bjdms_cache::provider::CacheManager;
use bjdms_core::result::AppResult;
use bjdms_core::traits::CacheProvider;

use crate::deadline::with_deadline;

const ACTIVE: &str = "active";
const REVOKED: &str = "1";

/// Registers, checks, and drops token sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    cache: Arc<CacheManager>,
    timeout: Duration,
}

impl SessionStore {
    /// Creates a session store; every call is bounded by `timeout`.
    pub fn new(cache: Arc<CacheManager>, timeout: Duration) -> Self {
        Self { cache, timeout }
    }

    /// Mark a token as live for `ttl`.
    pub async fn set_session(&self, user_id: Uuid, token_id: &str, ttl: Duration) -> AppResult<()> {
        let key = keys::session(user_id, token_id);
        with_deadline(self.timeout, "session set", self.cache.set(&key, ACTIVE, ttl)).await
    }

    /// Whether a token's session is still live.
    pub async fn validate_session(&self, user_id: Uuid, token_id: &str) -> AppResult<bool> {
        let key = keys::session(user_id, token_id);
        with_deadline(self.timeout, "session lookup", self.cache.exists(&key)).await
    }

    /// Drop one session.
    pub async fn invalidate_session(&self, user_id: Uuid, token_id: &str) -> AppResult<()> {
        let key = keys::session(user_id, token_id);
        with_deadline(self.timeout, "session delete", self.cache.delete(&key)).await?;
        debug!(user_id = %user_id, "Session invalidated");
        Ok(())
    }

    /// Drop every session of a user.
    ///
    /// Best-effort: the key scan is incremental, so a session registered while
    /// the sweep runs may survive it.
    pub async fn invalidate_all_sessions(&self, user_id: Uuid) -> AppResult<u64> {
        let pattern = keys::user_sessions_pattern(user_id);
        let removed = with_deadline(
            self.timeout,
            "session sweep",
            self.cache.delete_pattern(&pattern),
        )
        .await?;
        info!(user_id = %user_id, removed, "All sessions invalidated");
        Ok(removed)
    }

    /// Whether a token identifier carries a revocation marker.
    pub async fn is_revoked(&self, token_id: &str) -> AppResult<bool> {
        let key = keys::revoked(token_id);
        with_deadline(self.timeout, "revocation lookup", self.cache.exists(&key)).await
    }

    /// Write a revocation marker that outlives the token by at most `ttl`.
    pub async fn revoke(&self, token_id: &str, ttl: Duration) -> AppResult<()> {
        let key = keys::revoked(token_id);
        with_deadline(self.timeout, "revocation write", self.cache.set(&key, REVOKED, ttl)).await
    }
}
