//! Auth handlers: login, refresh, logout, session introspection.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use chrono::DateTime;

use bjdms_auth::{LoginResult, RefreshResult};
use bjdms_core::error::AppError;

use crate::dto::request::{LoginRequest, RefreshRequest};
use crate::dto::response::{ApiResponse, RevokedSessionsResponse, SessionInfoResponse};
use crate::error::ApiError;
use crate::extractors::{AuthenticatedUser, ClientInfo, ValidatedJson};
use crate::state::AppState;

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    let result = state
        .auth_service
        .login(&req.phone, &req.password, client.ip_address, client.user_agent)
        .await?;

    Ok(Json(ApiResponse::with_message(result, "Login successful")))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResult>>, ApiError> {
    let result = state.auth_service.refresh_tokens(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/v1/auth/logout
///
/// Always 200; the message says what was found.
pub async fn logout(
    State(state): State<AppState>,
    client: ClientInfo,
    headers: HeaderMap,
) -> Json<ApiResponse<Option<()>>> {
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    let outcome = state
        .auth_service
        .logout(authorization, client.ip_address, client.user_agent)
        .await;

    Json(ApiResponse::with_message(None, outcome.message()))
}

/// GET /api/v1/auth/session
pub async fn session(
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<SessionInfoResponse>>, ApiError> {
    let expires_at = DateTime::from_timestamp(user.claims.exp, 0)
        .ok_or_else(|| AppError::internal("Token expiry out of range"))?;

    Ok(Json(ApiResponse::ok(SessionInfoResponse {
        user_id: user.user_id,
        token_id: user.token_id().to_string(),
        expires_at,
    })))
}

/// POST /api/v1/auth/logout-all
pub async fn logout_all(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<RevokedSessionsResponse>>, ApiError> {
    let sessions_revoked = state
        .auth_service
        .invalidate_all_sessions(user.user_id, user.user_id)
        .await?;

    Ok(Json(ApiResponse::with_message(
        RevokedSessionsResponse {
            user_id: user.user_id,
            sessions_revoked,
        },
        "All sessions invalidated",
    )))
}
