//! Session liveness and revocation markers.

pub mod store;

pub use store::SessionStore;
