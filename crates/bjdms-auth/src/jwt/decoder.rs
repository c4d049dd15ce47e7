//! Token verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use bjdms_core::config::auth::AuthConfig;

use super::ISSUER;
use super::claims::{Claims, TokenType};
use super::error::TokenError;

/// Clock skew tolerated on `exp` and `nbf`, in seconds.
const LEEWAY_SECONDS: u64 = 5;

/// Verifies access and refresh tokens against their separate secrets.
///
/// Pure: no store lookups happen here.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = LEEWAY_SECONDS;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "iss", "sub"]);

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Verify an access token with the access secret.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, &self.access_key, TokenType::Access)
    }

    /// Verify a refresh token with the refresh secret.
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, &self.refresh_key, TokenType::Refresh)
    }

    fn verify(
        &self,
        token: &str,
        key: &DecodingKey,
        expected: TokenType,
    ) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, key, &self.validation)?;
        if data.claims.token_type != expected {
            return Err(TokenError::Malformed);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use uuid::Uuid;

    fn config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-secret-for-tests".to_string(),
            refresh_secret: "refresh-secret-for-tests".to_string(),
            ..AuthConfig::default()
        }
    }

    fn claims(token_type: TokenType, exp_offset: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4(),
            jti: "jti".to_string(),
            token_type,
            phone: None,
            is_verified: false,
            iss: ISSUER.to_string(),
            iat: now,
            nbf: now,
            exp: now + exp_offset,
        }
    }

    #[test]
    fn access_token_round_trips_with_identity_hint() {
        let cfg = config();
        let encoder = JwtEncoder::new(&cfg);
        let decoder = JwtDecoder::new(&cfg);
        let user_id = Uuid::new_v4();

        let issued = encoder
            .issue_access_token(user_id, "+8801700000000", true)
            .unwrap();
        let claims = decoder.verify_access_token(&issued.token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.jti, issued.token_id);
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.phone.as_deref(), Some("+8801700000000"));
        assert!(claims.is_verified);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn token_kinds_do_not_cross_verify() {
        let cfg = config();
        let encoder = JwtEncoder::new(&cfg);
        let decoder = JwtDecoder::new(&cfg);
        let user_id = Uuid::new_v4();

        let access = encoder.issue_access_token(user_id, "+8801700000000", false).unwrap();
        let refresh = encoder.issue_refresh_token(user_id).unwrap();

        assert!(decoder.verify_refresh_token(&access.token).is_err());
        assert!(decoder.verify_access_token(&refresh.token).is_err());
        assert!(decoder.verify_refresh_token(&refresh.token).is_ok());
    }

    #[test]
    fn refresh_kind_signed_with_access_secret_is_rejected() {
        let cfg = config();
        let decoder = JwtDecoder::new(&cfg);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims(TokenType::Refresh, 600),
            &EncodingKey::from_secret(cfg.access_secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(decoder.verify_access_token(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let cfg = config();
        let decoder = JwtDecoder::new(&cfg);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims(TokenType::Access, -120),
            &EncodingKey::from_secret(cfg.access_secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(decoder.verify_access_token(&token), Err(TokenError::Expired));
    }

    #[test]
    fn other_algorithms_are_rejected() {
        let cfg = config();
        let decoder = JwtDecoder::new(&cfg);
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims(TokenType::Access, 600),
            &EncodingKey::from_secret(cfg.access_secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(
            decoder.verify_access_token(&token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn wrong_secret_is_an_invalid_signature() {
        let decoder = JwtDecoder::new(&config());
        let other = JwtEncoder::new(&AuthConfig {
            access_secret: "someone-else".to_string(),
            refresh_secret: "someone-else-refresh".to_string(),
            ..AuthConfig::default()
        });
        let issued = other
            .issue_access_token(Uuid::new_v4(), "+8801700000000", false)
            .unwrap();

        assert_eq!(
            decoder.verify_access_token(&issued.token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let decoder = JwtDecoder::new(&config());
        assert_eq!(
            decoder.verify_access_token("not-a-jwt"),
            Err(TokenError::Malformed)
        );
    }
}
