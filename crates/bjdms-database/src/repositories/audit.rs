//! Audit log repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use bjdms_core::error::{AppError, ErrorKind};
use bjdms_core::result::AppResult;
use bjdms_entity::audit::{AuditSink, CreateAuditLogEntry};

/// Repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for AuditLogRepository {
    async fn create_audit_log(&self, entry: CreateAuditLogEntry) -> AppResult<()> {
        sqlx::query(
            r#"INSERT INTO audit_logs
                   (id, user_id, action, entity, entity_id, metadata, ip_address, user_agent, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"#,
        )
        .bind(Uuid::now_v7())
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.entity)
        .bind(entry.entity_id)
        .bind(&entry.metadata)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(entry.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write audit entry", e))?;
        Ok(())
    }
}
