//! # bjdms-core
//!
//! Core crate for the BJDMS backend. Contains the unified error system,
//! layered configuration schemas, the cache provider trait, and the
//! authentication domain events.
//!
//! This crate has **no** internal dependencies on other BJDMS crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
