//! Key builders for every session store entry.
//!
//! Centralising key construction keeps the Redis layout in one place. The
//! backend adds its configured prefix on top of these.

use uuid::Uuid;

// ── Session keys ───────────────────────────────────────────

/// Liveness marker for one issued token.
pub fn session(user_id: Uuid, token_id: &str) -> String {
    format!("session:{user_id}:{token_id}")
}

/// Pattern matching every session of a user.
pub fn user_sessions_pattern(user_id: Uuid) -> String {
    format!("session:{user_id}:*")
}

// ── Revocation keys ────────────────────────────────────────

/// Revocation marker for a token identifier.
pub fn revoked(token_id: &str) -> String {
    format!("revoked:{token_id}")
}
