//! Health check handler.

use axum::Json;
use axum::extract::State;

use bjdms_core::traits::cache::CacheProvider;

use crate::dto::response::{ApiResponse, CacheHealth, HealthResponse};
use crate::state::AppState;

/// GET /api/v1/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let cache_healthy = state.cache.health_check().await.unwrap_or(false);

    let database = match &state.database {
        Some(db) => match db.health_check().await {
            Ok(true) => "connected",
            _ => "unavailable",
        },
        None => "not_configured",
    };

    let status = if cache_healthy && database != "unavailable" {
        "ok"
    } else {
        "degraded"
    };

    Json(ApiResponse::ok(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        cache: CacheHealth {
            provider: state.cache.provider_name(),
            healthy: cache_healthy,
        },
        database,
        audit_events_dropped: state.audit.dropped_count(),
    }))
}
