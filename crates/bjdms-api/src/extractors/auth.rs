//! `AuthenticatedUser` extractor: runs the bearer token guard and hands the
//! caller identity to handlers explicitly.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use bjdms_auth::Claims;

use crate::error::ApiError;
use crate::state::AppState;

/// Identity of the caller of a protected route.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The `sub` claim.
    pub user_id: Uuid,
    /// Verified access token claims.
    pub claims: Claims,
}

impl AuthenticatedUser {
    /// Identifier of the presented access token.
    pub fn token_id(&self) -> &str {
        &self.claims.jti
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A scope middleware earlier in the stack may have authenticated already.
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let claims = state.guard.authenticate(header).await?;
        let user = AuthenticatedUser {
            user_id: claims.sub,
            claims,
        };

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
