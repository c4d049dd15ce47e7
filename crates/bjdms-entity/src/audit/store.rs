//! Audit sink contract.

use async_trait::async_trait;

use bjdms_core::result::AppResult;

use super::model::CreateAuditLogEntry;

/// Write-only destination for audit rows.
#[async_trait]
pub trait AuditSink: Send + Sync + 'static {
    /// Persist one audit entry.
    async fn create_audit_log(&self, entry: CreateAuditLogEntry) -> AppResult<()>;
}
