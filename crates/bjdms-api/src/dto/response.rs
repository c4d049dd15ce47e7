//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Success envelope: `{success: true, data, message?}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wraps `data` with no message.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// Wraps `data` with a human-readable message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// `GET /auth/session`
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfoResponse {
    pub user_id: Uuid,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of a bulk session invalidation.
#[derive(Debug, Clone, Serialize)]
pub struct RevokedSessionsResponse {
    pub user_id: Uuid,
    pub sessions_revoked: u64,
}

/// `GET /jurisdictions/access`
#[derive(Debug, Clone, Serialize)]
pub struct JurisdictionAccessResponse {
    pub jurisdiction_id: Option<Uuid>,
    pub in_scope: bool,
}

/// `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cache: CacheHealth,
    pub database: &'static str,
    pub audit_events_dropped: u64,
}

/// Session store status within [`HealthResponse`].
#[derive(Debug, Clone, Serialize)]
pub struct CacheHealth {
    pub provider: &'static str,
    pub healthy: bool,
}
