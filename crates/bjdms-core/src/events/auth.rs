//! Authentication domain events.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Why a login attempt for a known account was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginFailureReason {
    /// The account is deactivated.
    InactiveAccount,
    /// The account is inside its lockout window.
    AccountLocked,
    /// The password did not match.
    InvalidPassword,
}

impl fmt::Display for LoginFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InactiveAccount => write!(f, "inactive_account"),
            Self::AccountLocked => write!(f, "account_locked"),
            Self::InvalidPassword => write!(f, "invalid_password"),
        }
    }
}

/// Events related to login, token lifecycle, and sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthEvent {
    /// Credentials were accepted and tokens issued.
    LoginSucceeded {
        /// The user ID.
        user_id: Uuid,
    },
    /// A login attempt for an existing account failed.
    LoginFailed {
        /// The user ID.
        user_id: Uuid,
        /// Why it failed.
        reason: LoginFailureReason,
        /// Failed attempts after this one, when known.
        failed_attempts: Option<i32>,
    },
    /// A new access token was minted from a refresh token.
    TokenRefreshed {
        /// The user ID.
        user_id: Uuid,
    },
    /// A single session was logged out.
    LoggedOut {
        /// The user ID.
        user_id: Uuid,
        /// The access token's identifier.
        token_id: String,
    },
    /// Every session of a user was invalidated.
    SessionsRevoked {
        /// The user whose sessions were dropped.
        user_id: Uuid,
        /// Who requested it (the user themself or an administrator).
        revoked_by: Uuid,
        /// Session keys removed.
        count: u64,
    },
}

impl AuthEvent {
    /// Audit log action name.
    pub fn action(&self) -> &'static str {
        match self {
            Self::LoginSucceeded { .. } => "login_success",
            Self::LoginFailed { .. } => "login_failed",
            Self::TokenRefreshed { .. } => "token_refreshed",
            Self::LoggedOut { .. } => "logout",
            Self::SessionsRevoked { .. } => "sessions_revoked",
        }
    }

    /// Audit log entity type. Every auth event targets a user row.
    pub fn entity(&self) -> &'static str {
        "user"
    }

    /// The user the event is about.
    pub fn subject_id(&self) -> Uuid {
        match self {
            Self::LoginSucceeded { user_id }
            | Self::LoginFailed { user_id, .. }
            | Self::TokenRefreshed { user_id }
            | Self::LoggedOut { user_id, .. }
            | Self::SessionsRevoked { user_id, .. } => *user_id,
        }
    }

    /// Event-specific detail stored as audit metadata.
    pub fn metadata(&self) -> serde_json::Value {
        match self {
            Self::LoginFailed {
                reason,
                failed_attempts,
                ..
            } => serde_json::json!({
                "reason": reason.to_string(),
                "failed_attempts": failed_attempts,
            }),
            Self::LoggedOut { token_id, .. } => serde_json::json!({ "token_id": token_id }),
            Self::SessionsRevoked {
                revoked_by, count, ..
            } => serde_json::json!({
                "revoked_by": revoked_by,
                "sessions": count,
            }),
            Self::LoginSucceeded { .. } | Self::TokenRefreshed { .. } => serde_json::json!({}),
        }
    }
}
