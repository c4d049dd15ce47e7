//! # bjdms-database
//!
//! PostgreSQL connection management and the Postgres implementations of the
//! credential store, jurisdiction hierarchy, and audit sink.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
