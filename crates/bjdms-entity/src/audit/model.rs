//! Audit log entry written by the audit pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Data required to create an audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    /// The acting user, when known.
    pub user_id: Option<Uuid>,
    /// Action name.
    pub action: String,
    /// Entity type.
    pub entity: String,
    /// Entity identifier.
    pub entity_id: Option<Uuid>,
    /// Action-specific detail.
    pub metadata: serde_json::Value,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client User-Agent.
    pub user_agent: Option<String>,
    /// When the action occurred (not when it was persisted).
    pub occurred_at: DateTime<Utc>,
}
