//! Jurisdiction scope check.
//!
//! A caller may act on a target jurisdiction when it is their own or lies in
//! their subtree. Rank 1 bypasses the check; a caller without a jurisdiction
//! is always out of scope.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};
use uuid::Uuid;

use bjdms_core::error::{AppError, ErrorKind};
use bjdms_core::result::AppResult;
use bjdms_entity::jurisdiction::{JurisdictionHierarchy, JurisdictionScope, Reachability};
use bjdms_entity::user::CredentialStore;

use crate::deadline::with_deadline;

/// Longest ancestor chain walked before the data is treated as corrupt.
pub const MAX_HIERARCHY_DEPTH: usize = 16;

/// Resolves caller scope and answers subtree questions.
#[derive(Clone)]
pub struct ScopeChecker {
    credentials: Arc<dyn CredentialStore>,
    hierarchy: Arc<dyn JurisdictionHierarchy>,
    timeout: Duration,
}

impl std::fmt::Debug for ScopeChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeChecker")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ScopeChecker {
    /// Creates a new scope checker.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hierarchy: Arc<dyn JurisdictionHierarchy>,
        timeout: Duration,
    ) -> Self {
        Self {
            credentials,
            hierarchy,
            timeout,
        }
    }

    /// Whether a caller at `caller` with `rank` may act on `target`.
    pub async fn in_scope(&self, caller: Option<Uuid>, rank: i32, target: Uuid) -> AppResult<bool> {
        let scope = JurisdictionScope {
            jurisdiction_id: caller,
            rank,
        };
        if scope.is_super_authority() {
            return Ok(true);
        }
        let Some(caller) = caller else {
            return Ok(false);
        };
        if caller == target {
            return Ok(true);
        }

        let reach = with_deadline(
            self.timeout,
            "hierarchy lookup",
            self.hierarchy
                .is_descendant(caller, target, MAX_HIERARCHY_DEPTH),
        )
        .await
        .map_err(|e| lookup_failure("hierarchy lookup", e))?;

        match reach {
            Reachability::Descendant => Ok(true),
            Reachability::Unrelated => Ok(false),
            Reachability::DepthExceeded => {
                warn!(
                    caller = %caller,
                    target = %target,
                    max_depth = MAX_HIERARCHY_DEPTH,
                    "Jurisdiction hierarchy deeper than allowed; treating as out of scope"
                );
                Ok(false)
            }
        }
    }

    /// Jurisdiction and rank of a user.
    pub async fn caller_scope(&self, user_id: Uuid) -> AppResult<JurisdictionScope> {
        with_deadline(
            self.timeout,
            "authorization details lookup",
            self.credentials.get_user_auth_details(user_id),
        )
        .await
        .map_err(|e| match e.kind {
            ErrorKind::NotFound => {
                AppError::session_inactive("User authorization details not found")
            }
            _ => lookup_failure("authorization details lookup", e),
        })
    }

    /// Reject unless `user_id` may act on `target`.
    pub async fn require_scope(&self, user_id: Uuid, target: Uuid) -> AppResult<()> {
        let scope = self.caller_scope(user_id).await?;

        if scope.is_super_authority() {
            return Ok(());
        }
        if scope.jurisdiction_id.is_none() {
            return Err(AppError::forbidden(
                "You must be part of a committee to manage organizational units",
            ));
        }

        if self.in_scope(scope.jurisdiction_id, scope.rank, target).await? {
            Ok(())
        } else {
            debug!(user_id = %user_id, target = %target, "Target jurisdiction out of scope");
            Err(AppError::forbidden(
                "Access denied: Target jurisdiction is outside your area of responsibility",
            ))
        }
    }

    /// Reject unless `user_id` holds rank 1.
    pub async fn require_super_authority(&self, user_id: Uuid) -> AppResult<()> {
        if self.caller_scope(user_id).await?.is_super_authority() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Only the central authority may perform this action",
            ))
        }
    }
}

fn lookup_failure(operation: &'static str, err: AppError) -> AppError {
    if err.kind == ErrorKind::ServiceUnavailable {
        return err;
    }
    error!(operation, error = %err, "Scope lookup failed; rejecting request");
    AppError::with_source(
        ErrorKind::ServiceUnavailable,
        "Authorization temporarily unavailable",
        err,
    )
}
