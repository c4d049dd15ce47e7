//! Audit log entity and its sink.

pub mod model;
pub mod store;

pub use model::CreateAuditLogEntry;
pub use store::AuditSink;
