//! Jurisdiction scope of a caller.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Rank that bypasses every jurisdiction scope check.
pub const SUPER_AUTHORITY_RANK: i32 = 1;

/// Rank of a user who holds no position.
pub const NO_POSITION_RANK: i32 = 999;

/// What the scope check needs to know about a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct JurisdictionScope {
    /// The jurisdiction the caller's committee belongs to.
    pub jurisdiction_id: Option<Uuid>,
    /// Position rank; see [`SUPER_AUTHORITY_RANK`] and [`NO_POSITION_RANK`].
    pub rank: i32,
}

impl JurisdictionScope {
    /// Whether this caller bypasses scope checks.
    pub fn is_super_authority(&self) -> bool {
        self.rank == SUPER_AUTHORITY_RANK
    }
}

impl Default for JurisdictionScope {
    fn default() -> Self {
        Self {
            jurisdiction_id: None,
            rank: NO_POSITION_RANK,
        }
    }
}
