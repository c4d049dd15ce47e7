//! Postgres implementations of the collaborator stores.

pub mod audit;
pub mod jurisdiction;
pub mod user;

pub use audit::AuditLogRepository;
pub use jurisdiction::JurisdictionRepository;
pub use user::CredentialRepository;
