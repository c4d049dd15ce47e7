//! Per-request authorization gate.
//!
//! A request moves through `NoToken → ParseError → SignatureInvalid →
//! SessionInactive → Revoked → Authenticated`. The signature is checked before
//! any store lookup, and a store failure rejects the request.

use std::sync::Arc;

use tracing::{debug, error};

use bjdms_core::error::{AppError, ErrorKind};
use bjdms_core::result::AppResult;

use crate::jwt::{Claims, JwtDecoder, TokenError};
use crate::session::SessionStore;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn parse_bearer(header: Option<&str>) -> AppResult<&str> {
    let header = header.ok_or_else(|| AppError::invalid_token("Missing authorization header"))?;

    match header.strip_prefix(BEARER_PREFIX).map(str::trim) {
        Some(token) if !token.is_empty() && !token.contains(' ') => Ok(token),
        _ => Err(AppError::invalid_token(
            "Invalid authorization header format",
        )),
    }
}

/// Admits a request only for a valid access token with a live, unrevoked session.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    decoder: Arc<JwtDecoder>,
    sessions: Arc<SessionStore>,
}

impl AuthGuard {
    /// Creates a new guard.
    pub fn new(decoder: Arc<JwtDecoder>, sessions: Arc<SessionStore>) -> Self {
        Self { decoder, sessions }
    }

    /// Run the full check on a raw `Authorization` header value.
    pub async fn authenticate(&self, authorization: Option<&str>) -> AppResult<Claims> {
        let token = parse_bearer(authorization)?;

        let claims = self.decoder.verify_access_token(token).map_err(|e| {
            match e {
                TokenError::Expired => debug!("Rejected expired access token"),
                other => debug!(reason = %other, "Rejected access token"),
            }
            AppError::invalid_token("Invalid or expired token")
        })?;

        require_live_session(&self.sessions, &claims).await?;
        Ok(claims)
    }
}

/// Session liveness then revocation, for a token whose signature already
/// verified.
pub(crate) async fn require_live_session(
    sessions: &SessionStore,
    claims: &Claims,
) -> AppResult<()> {
    let live = sessions
        .validate_session(claims.sub, &claims.jti)
        .await
        .map_err(|e| store_failure("session lookup", e))?;
    if !live {
        debug!(user_id = %claims.sub, "Session not found for token");
        return Err(AppError::session_inactive("Session expired or revoked"));
    }

    let revoked = sessions
        .is_revoked(&claims.jti)
        .await
        .map_err(|e| store_failure("revocation lookup", e))?;
    if revoked {
        debug!(user_id = %claims.sub, "Revoked token presented");
        return Err(AppError::session_inactive("Token revoked"));
    }

    Ok(())
}

fn store_failure(operation: &'static str, err: AppError) -> AppError {
    error!(operation, error = %err, "Session store unavailable; rejecting request");
    AppError::with_source(
        ErrorKind::ServiceUnavailable,
        "Authentication temporarily unavailable",
        err,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bjdms_cache::provider::CacheManager;
    use bjdms_core::config::auth::AuthConfig;
    use uuid::Uuid;

    use crate::jwt::JwtEncoder;
    use crate::testing::BrokenCache;

    fn guard_with(
        cache: CacheManager,
        timeout: Duration,
    ) -> (AuthGuard, Arc<SessionStore>, JwtEncoder) {
        let config = AuthConfig::default();
        let sessions = Arc::new(SessionStore::new(Arc::new(cache), timeout));
        let guard = AuthGuard::new(Arc::new(JwtDecoder::new(&config)), Arc::clone(&sessions));
        (guard, sessions, JwtEncoder::new(&config))
    }

    #[test]
    fn bearer_parsing() {
        assert_eq!(parse_bearer(Some("Bearer abc")).unwrap(), "abc");
        assert_eq!(
            parse_bearer(None).unwrap_err().message,
            "Missing authorization header"
        );
        for bad in ["abc", "Basic abc", "Bearer ", "Bearer a b", "bearer abc"] {
            let err = parse_bearer(Some(bad)).unwrap_err();
            assert_eq!(err.message, "Invalid authorization header format", "{bad}");
        }
    }

    #[tokio::test]
    async fn live_session_is_admitted() {
        let (guard, sessions, encoder) =
            guard_with(CacheManager::in_memory(), Duration::from_secs(1));
        let user_id = Uuid::new_v4();
        let issued = encoder
            .issue_access_token(user_id, "+8801700000000", false)
            .unwrap();
        sessions
            .set_session(user_id, &issued.token_id, issued.ttl)
            .await
            .unwrap();

        let header = format!("Bearer {}", issued.token);
        let claims = guard.authenticate(Some(&header)).await.unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[tokio::test]
    async fn missing_session_is_inactive() {
        let (guard, _, encoder) = guard_with(CacheManager::in_memory(), Duration::from_secs(1));
        let issued = encoder
            .issue_access_token(Uuid::new_v4(), "+8801700000000", false)
            .unwrap();

        let header = format!("Bearer {}", issued.token);
        let err = guard.authenticate(Some(&header)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::SessionInactive);
        assert_eq!(err.message, "Session expired or revoked");
    }

    #[tokio::test]
    async fn revoked_token_is_rejected_even_with_session() {
        let (guard, sessions, encoder) =
            guard_with(CacheManager::in_memory(), Duration::from_secs(1));
        let user_id = Uuid::new_v4();
        let issued = encoder
            .issue_access_token(user_id, "+8801700000000", false)
            .unwrap();
        sessions
            .set_session(user_id, &issued.token_id, issued.ttl)
            .await
            .unwrap();
        sessions.revoke(&issued.token_id, issued.ttl).await.unwrap();

        let header = format!("Bearer {}", issued.token);
        let err = guard.authenticate(Some(&header)).await.unwrap_err();
        assert_eq!(err.message, "Token revoked");
    }

    #[tokio::test]
    async fn bad_signature_never_reaches_the_store() {
        let (guard, _, _) = guard_with(
            CacheManager::from_provider(Arc::new(BrokenCache::failing())),
            Duration::from_secs(1),
        );
        let err = guard
            .authenticate(Some("Bearer not.a.token"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[tokio::test]
    async fn store_error_fails_closed() {
        let (guard, _, encoder) = guard_with(
            CacheManager::from_provider(Arc::new(BrokenCache::failing())),
            Duration::from_secs(1),
        );
        let issued = encoder
            .issue_access_token(Uuid::new_v4(), "+8801700000000", false)
            .unwrap();

        let header = format!("Bearer {}", issued.token);
        let err = guard.authenticate(Some(&header)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    }

    #[tokio::test]
    async fn store_timeout_fails_closed() {
        let (guard, _, encoder) = guard_with(
            CacheManager::from_provider(Arc::new(BrokenCache::hanging())),
            Duration::from_millis(50),
        );
        let issued = encoder
            .issue_access_token(Uuid::new_v4(), "+8801700000000", false)
            .unwrap();

        let header = format!("Bearer {}", issued.token);
        let err = guard.authenticate(Some(&header)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    }
}
