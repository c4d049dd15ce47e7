//! Administrative session control.

use axum::Json;
use axum::extract::{Path, State};
use tracing::info;
use uuid::Uuid;

use crate::dto::response::{ApiResponse, RevokedSessionsResponse};
use crate::error::ApiError;
use crate::extractors::AuthenticatedUser;
use crate::state::AppState;

/// DELETE /api/v1/admin/users/{user_id}/sessions
///
/// Force-logout of another user. Central authority only.
pub async fn revoke_user_sessions(
    State(state): State<AppState>,
    admin: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RevokedSessionsResponse>>, ApiError> {
    state.scope.require_super_authority(admin.user_id).await?;

    let sessions_revoked = state
        .auth_service
        .invalidate_all_sessions(user_id, admin.user_id)
        .await?;

    info!(
        user_id = %user_id,
        revoked_by = %admin.user_id,
        sessions_revoked,
        "Sessions revoked by administrator"
    );

    Ok(Json(ApiResponse::with_message(
        RevokedSessionsResponse {
            user_id,
            sessions_revoked,
        },
        "User sessions invalidated",
    )))
}
