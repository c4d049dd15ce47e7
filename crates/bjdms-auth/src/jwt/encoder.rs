//! Token creation.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use bjdms_core::config::auth::AuthConfig;
use bjdms_core::error::AppError;
use bjdms_core::result::AppResult;

use super::ISSUER;
use super::claims::{Claims, TokenType};
use super::token_id::generate_token_id;

/// A freshly minted token and what the session store needs to register it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded JWT.
    pub token: String,
    /// The `jti` claim.
    pub token_id: String,
    /// The `exp` claim.
    pub expires_at: DateTime<Utc>,
    /// Lifetime, used as the session TTL.
    pub ttl: Duration,
}

/// Signs access and refresh tokens with their separate secrets.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: config.access_ttl(),
            refresh_ttl: config.refresh_ttl(),
        }
    }

    /// Access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Mint a short-lived access token.
    pub fn issue_access_token(
        &self,
        user_id: Uuid,
        phone: &str,
        is_verified: bool,
    ) -> AppResult<IssuedToken> {
        self.issue(
            user_id,
            TokenType::Access,
            Some(phone.to_string()),
            is_verified,
            self.access_ttl,
            &self.access_key,
        )
    }

    /// Mint an access token without an identity hint, as done on refresh.
    pub fn reissue_access_token(&self, user_id: Uuid) -> AppResult<IssuedToken> {
        self.issue(
            user_id,
            TokenType::Access,
            None,
            false,
            self.access_ttl,
            &self.access_key,
        )
    }

    /// Mint a long-lived refresh token.
    pub fn issue_refresh_token(&self, user_id: Uuid) -> AppResult<IssuedToken> {
        self.issue(
            user_id,
            TokenType::Refresh,
            None,
            false,
            self.refresh_ttl,
            &self.refresh_key,
        )
    }

    fn issue(
        &self,
        user_id: Uuid,
        token_type: TokenType,
        phone: Option<String>,
        is_verified: bool,
        ttl: Duration,
        key: &EncodingKey,
    ) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let lifetime = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::internal(format!("Token lifetime out of range: {e}")))?;
        let expires_at = now + lifetime;
        let token_id = generate_token_id();

        let claims = Claims {
            sub: user_id,
            jti: token_id.clone(),
            token_type,
            phone,
            is_verified,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))?;

        Ok(IssuedToken {
            token,
            token_id,
            expires_at,
            ttl,
        })
    }
}
