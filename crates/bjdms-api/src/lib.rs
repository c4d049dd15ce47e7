//! # bjdms-api
//!
//! HTTP surface of the BJDMS auth core, built on Axum.
//!
//! Provides the auth endpoints, the `AuthenticatedUser` extractor, login
//! throttling, jurisdiction scoping middleware, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{Stores, assemble_state, build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
