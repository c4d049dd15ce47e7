//! Jurisdiction hierarchy contract.

use async_trait::async_trait;
use uuid::Uuid;

use bjdms_core::result::AppResult;

/// Answer of a descendant query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    /// The node lies strictly below the ancestor.
    Descendant,
    /// The walk reached a root without meeting the ancestor.
    Unrelated,
    /// The walk gave up after the depth bound (cycle or corrupted data).
    DepthExceeded,
}

/// Read access to the jurisdiction tree.
#[async_trait]
pub trait JurisdictionHierarchy: Send + Sync + 'static {
    /// Parent of `node`, `None` for a root or unknown node.
    async fn parent_of(&self, node: Uuid) -> AppResult<Option<Uuid>>;

    /// Whether `node` is a strict descendant of `ancestor`.
    ///
    /// The default walks `parent_of` upward at most `max_depth` steps. Stores
    /// with a materialized path override this with a direct membership test.
    async fn is_descendant(
        &self,
        ancestor: Uuid,
        node: Uuid,
        max_depth: usize,
    ) -> AppResult<Reachability> {
        let mut current = node;
        for _ in 0..max_depth {
            match self.parent_of(current).await? {
                Some(parent) if parent == ancestor => return Ok(Reachability::Descendant),
                Some(parent) => current = parent,
                None => return Ok(Reachability::Unrelated),
            }
        }
        Ok(Reachability::DepthExceeded)
    }
}
