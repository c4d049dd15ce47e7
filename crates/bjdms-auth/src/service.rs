//! Login, refresh, and logout flows.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use bjdms_core::config::auth::AuthConfig;
use bjdms_core::error::{AppError, ErrorKind};
use bjdms_core::events::{AuthEvent, DomainEvent, LoginFailureReason};
use bjdms_core::result::AppResult;
use bjdms_entity::user::{CredentialStore, User, UserProfile, mask_phone};

use crate::audit::AuditDispatcher;
use crate::deadline::with_deadline;
use crate::guard::{parse_bearer, require_live_session};
use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::lockout::LockoutPolicy;
use crate::password::{PasswordHasher, PasswordValidator};
use crate::session::SessionStore;

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    /// Public profile of the authenticated user.
    pub user: UserProfile,
}

/// Result of a token refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResult {
    /// Newly minted access token.
    pub access_token: String,
    /// The refresh token that was presented.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// What a logout call found. Every variant is a success for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// No `Authorization` header was sent.
    NoSession,
    /// The header was malformed or the token did not verify.
    InvalidToken,
    /// The token's session was dropped.
    LoggedOut,
}

impl LogoutOutcome {
    /// Client-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoSession => "Logged out (no session found)",
            Self::InvalidToken => "Logged out (invalid token)",
            Self::LoggedOut => "Logged out successfully",
        }
    }
}

/// Orchestrates the credential store, token service, and session store.
#[derive(Clone)]
pub struct AuthService {
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    sessions: Arc<SessionStore>,
    hasher: Arc<PasswordHasher>,
    validator: PasswordValidator,
    credentials: Arc<dyn CredentialStore>,
    lockout: LockoutPolicy,
    audit: Arc<AuditDispatcher>,
    refresh_requires_live_session: bool,
    revoke_on_logout: bool,
    store_timeout: Duration,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("lockout", &self.lockout)
            .field(
                "refresh_requires_live_session",
                &self.refresh_requires_live_session,
            )
            .field("revoke_on_logout", &self.revoke_on_logout)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates a new authentication service.
    pub fn new(
        config: &AuthConfig,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        sessions: Arc<SessionStore>,
        hasher: Arc<PasswordHasher>,
        credentials: Arc<dyn CredentialStore>,
        audit: Arc<AuditDispatcher>,
    ) -> Self {
        Self {
            encoder,
            decoder,
            sessions,
            hasher,
            validator: PasswordValidator,
            lockout: LockoutPolicy::new(Arc::clone(&credentials), config),
            credentials,
            audit,
            refresh_requires_live_session: config.refresh_requires_live_session,
            revoke_on_logout: config.revoke_on_logout,
            store_timeout: config.store_timeout(),
        }
    }

    /// Performs the login flow:
    ///
    /// 1. Find the user by phone
    /// 2. Reject inactive accounts
    /// 3. Reject accounts inside a lockout window
    /// 4. Verify the password, counting a mismatch
    /// 5. Reset the failure counter
    /// 6. Issue both tokens and register their sessions
    /// 7. Audit
    /// 8. Return tokens and the public profile
    pub async fn login(
        &self,
        phone: &str,
        password: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<LoginResult> {
        self.validator.validate_phone(phone)?;

        // Step 1: Find user
        let user = with_deadline(
            self.store_timeout,
            "user lookup",
            self.credentials.get_by_phone(phone),
        )
        .await
        .map_err(login_dependency)?
        .ok_or_else(|| {
            debug!(phone = %mask_phone(phone), "Login for unknown phone");
            AppError::invalid_credentials()
        })?;

        // Step 2: Active flag
        if !user.is_active {
            self.audit_failure(
                &user,
                LoginFailureReason::InactiveAccount,
                None,
                &ip_address,
                &user_agent,
            );
            return Err(AppError::account_inactive());
        }

        // Step 3: Lockout window
        if self.lockout.is_locked(&user, Utc::now()) {
            info!(
                user_id = %user.id,
                locked_until = ?user.locked_until,
                "Login refused for locked account"
            );
            self.audit_failure(
                &user,
                LoginFailureReason::AccountLocked,
                None,
                &ip_address,
                &user_agent,
            );
            return Err(AppError::account_locked());
        }

        // Step 4: Password
        let valid = self
            .hasher
            .verify_password(password, &user.password_hash)?;
        if !valid {
            let outcome = self.lockout.record_failure(phone).await;
            let attempts = outcome.map(|o| o.failed_login_attempts);
            info!(user_id = %user.id, attempts = ?attempts, "Login failed: invalid password");
            self.audit_failure(
                &user,
                LoginFailureReason::InvalidPassword,
                attempts,
                &ip_address,
                &user_agent,
            );
            return Err(AppError::invalid_credentials());
        }

        // Step 5: Reset counter
        self.lockout.record_success(phone).await;

        // Step 6: Tokens and sessions
        let access = self
            .encoder
            .issue_access_token(user.id, &user.phone, user.is_verified())?;
        let refresh = self.encoder.issue_refresh_token(user.id)?;

        self.sessions
            .set_session(user.id, &access.token_id, access.ttl)
            .await
            .map_err(login_dependency)?;
        self.sessions
            .set_session(user.id, &refresh.token_id, refresh.ttl)
            .await
            .map_err(login_dependency)?;

        // Step 7: Audit
        self.audit.emit(
            DomainEvent::new(Some(user.id), AuthEvent::LoginSucceeded { user_id: user.id })
                .with_client(ip_address, user_agent),
        );

        info!(user_id = %user.id, "Login successful");

        // Step 8: Respond
        Ok(LoginResult {
            access_token: access.token,
            refresh_token: refresh.token,
            expires_in: access.ttl.as_secs(),
            user: user.profile(),
        })
    }

    /// Mint a new access token from a refresh token.
    ///
    /// The refresh token's own session is checked only when
    /// `auth.refresh_requires_live_session` is set.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> AppResult<RefreshResult> {
        let claims = self.decoder.verify_refresh_token(refresh_token).map_err(|e| {
            debug!(reason = %e, "Refresh token rejected");
            AppError::from(e)
        })?;

        if self.refresh_requires_live_session {
            require_live_session(&self.sessions, &claims).await?;
        }

        let access = self.encoder.reissue_access_token(claims.sub)?;
        self.sessions
            .set_session(claims.sub, &access.token_id, access.ttl)
            .await
            .map_err(login_dependency)?;

        self.audit.emit(DomainEvent::new(
            Some(claims.sub),
            AuthEvent::TokenRefreshed {
                user_id: claims.sub,
            },
        ));

        debug!(user_id = %claims.sub, "Access token refreshed");

        Ok(RefreshResult {
            access_token: access.token,
            refresh_token: refresh_token.to_string(),
            expires_in: access.ttl.as_secs(),
        })
    }

    /// Drop the session of the presented access token. Never fails.
    pub async fn logout(
        &self,
        authorization: Option<&str>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> LogoutOutcome {
        if authorization.is_none() {
            return LogoutOutcome::NoSession;
        }

        let claims = match parse_bearer(authorization)
            .ok()
            .and_then(|token| self.decoder.verify_access_token(token).ok())
        {
            Some(claims) => claims,
            None => return LogoutOutcome::InvalidToken,
        };

        if let Err(e) = self.sessions.invalidate_session(claims.sub, &claims.jti).await {
            error!(user_id = %claims.sub, error = %e, "Failed to invalidate session on logout");
        }

        if self.revoke_on_logout {
            let ttl = Duration::from_secs(claims.remaining_ttl_seconds().max(1));
            if let Err(e) = self.sessions.revoke(&claims.jti, ttl).await {
                warn!(user_id = %claims.sub, error = %e, "Failed to write revocation marker");
            }
        }

        self.audit.emit(
            DomainEvent::new(
                Some(claims.sub),
                AuthEvent::LoggedOut {
                    user_id: claims.sub,
                    token_id: claims.jti.clone(),
                },
            )
            .with_client(ip_address, user_agent),
        );

        info!(user_id = %claims.sub, "User logged out");
        LogoutOutcome::LoggedOut
    }

    /// Check a new password against the policy and hash it for storage.
    ///
    /// Account registration and password reset live in the user-management
    /// service; it calls this so stored hashes match what `login` verifies.
    pub fn hash_new_password(&self, password: &str) -> AppResult<String> {
        self.validator.validate(password)?;
        self.hasher.hash_password(password)
    }

    /// Drop every session of `user_id`, on behalf of `revoked_by`.
    pub async fn invalidate_all_sessions(&self, user_id: Uuid, revoked_by: Uuid) -> AppResult<u64> {
        let count = self.sessions.invalidate_all_sessions(user_id).await?;

        self.audit.emit(DomainEvent::new(
            Some(revoked_by),
            AuthEvent::SessionsRevoked {
                user_id,
                revoked_by,
                count,
            },
        ));

        Ok(count)
    }

    fn audit_failure(
        &self,
        user: &User,
        reason: LoginFailureReason,
        failed_attempts: Option<i32>,
        ip_address: &Option<String>,
        user_agent: &Option<String>,
    ) {
        self.audit.emit(
            DomainEvent::new(
                None,
                AuthEvent::LoginFailed {
                    user_id: user.id,
                    reason,
                    failed_attempts,
                },
            )
            .with_client(ip_address.clone(), user_agent.clone()),
        );
    }
}

fn login_dependency(err: AppError) -> AppError {
    error!(error = %err, "Login dependency failed");
    AppError::with_source(ErrorKind::Internal, "Login temporarily unavailable", err)
}
