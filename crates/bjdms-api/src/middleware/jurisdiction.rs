//! Jurisdiction scope middleware for routes that act on an organizational
//! unit named by `?jurisdiction_id=`.

use axum::extract::{Query, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use bjdms_core::error::AppError;

use crate::dto::request::JurisdictionQuery;
use crate::error::ApiError;
use crate::extractors::AuthenticatedUser;
use crate::state::AppState;

/// Admits the request only if the target jurisdiction is inside the caller's
/// subtree. Requests without a `jurisdiction_id` parameter pass through; a
/// query string that does not parse is rejected.
pub async fn require_jurisdiction_scope(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Query(query) = Query::<JurisdictionQuery>::try_from_uri(request.uri())
        .map_err(|_| AppError::validation("Invalid target jurisdiction ID"))?;
    let target = query.jurisdiction_id;

    let target = match target {
        Some(raw) => {
            let target = parse_target(&raw)?;
            state.scope.require_scope(user.user_id, target).await?;
            Some(target)
        }
        None => None,
    };

    request.extensions_mut().insert(TargetJurisdiction(target));
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Jurisdiction already checked against the caller's scope, if the request
/// named one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetJurisdiction(pub Option<Uuid>);

fn parse_target(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::validation("Invalid target jurisdiction ID"))
}
