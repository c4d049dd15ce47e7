//! Token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims payload of both token kinds.
///
/// A valid signature is necessary but not sufficient: the guard also requires
/// a live session for `(sub, jti)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user ID.
    pub sub: Uuid,
    /// Token identifier, the session and revocation key.
    pub jti: String,
    /// Access or refresh.
    pub token_type: TokenType,
    /// Login phone; access tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Whether the phone was verified at issuance; access tokens only.
    #[serde(default)]
    pub is_verified: bool,
    /// Issuer.
    pub iss: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Not-before (seconds since epoch).
    pub nbf: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token for API requests.
    Access,
    /// Long-lived token used only to mint access tokens.
    Refresh,
}

impl Claims {
    /// The user ID.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Remaining lifetime in seconds (0 if expired).
    pub fn remaining_ttl_seconds(&self) -> u64 {
        let remaining = self.exp - Utc::now().timestamp();
        if remaining > 0 { remaining as u64 } else { 0 }
    }
}
