//! Audit event pipeline.
//!
//! Flows hand [`DomainEvent`](bjdms_core::events::DomainEvent)s to the
//! dispatcher, which queues them and persists them off the request path.

pub mod dispatcher;

pub use dispatcher::AuditDispatcher;
