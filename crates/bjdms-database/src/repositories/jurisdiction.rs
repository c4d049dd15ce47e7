//! Jurisdiction hierarchy repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use bjdms_core::error::{AppError, ErrorKind};
use bjdms_core::result::AppResult;
use bjdms_entity::jurisdiction::{JurisdictionHierarchy, Reachability};

/// Postgres-backed hierarchy over the `jurisdictions` table.
///
/// Descendant checks use the materialized `ancestor_ids` path, so they cost
/// one indexed lookup regardless of depth.
#[derive(Debug, Clone)]
pub struct JurisdictionRepository {
    pool: PgPool,
}

impl JurisdictionRepository {
    /// Create a new jurisdiction repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JurisdictionHierarchy for JurisdictionRepository {
    async fn parent_of(&self, node: Uuid) -> AppResult<Option<Uuid>> {
        let parent: Option<Option<Uuid>> =
            sqlx::query_scalar("SELECT parent_id FROM jurisdictions WHERE id = $1")
                .bind(node)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load parent", e)
                })?;
        Ok(parent.flatten())
    }

    async fn is_descendant(
        &self,
        ancestor: Uuid,
        node: Uuid,
        max_depth: usize,
    ) -> AppResult<Reachability> {
        let row: Option<(bool, i32)> = sqlx::query_as(
            r#"SELECT $1 = ANY(ancestor_ids), cardinality(ancestor_ids)
               FROM jurisdictions
               WHERE id = $2"#,
        )
        .bind(ancestor)
        .bind(node)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check jurisdiction path", e)
        })?;

        Ok(match row {
            None => Reachability::Unrelated,
            Some((_, depth)) if depth as usize > max_depth => Reachability::DepthExceeded,
            Some((true, _)) => Reachability::Descendant,
            Some((false, _)) => Reachability::Unrelated,
        })
    }
}
