//! Jurisdiction access check for scoped pages.

use axum::Extension;
use axum::Json;

use crate::dto::response::{ApiResponse, JurisdictionAccessResponse};
use crate::middleware::jurisdiction::TargetJurisdiction;

/// GET /api/v1/jurisdictions/access?jurisdiction_id=…
///
/// Runs behind the scope middleware, so reaching the handler means access.
pub async fn access(
    Extension(TargetJurisdiction(target)): Extension<TargetJurisdiction>,
) -> Json<ApiResponse<JurisdictionAccessResponse>> {
    Json(ApiResponse::ok(JurisdictionAccessResponse {
        jurisdiction_id: target,
        in_scope: true,
    }))
}
