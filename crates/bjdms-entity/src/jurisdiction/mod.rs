//! Jurisdiction hierarchy entity and its store.

pub mod model;
pub mod store;

pub use model::{JurisdictionScope, NO_POSITION_RANK, SUPER_AUTHORITY_RANK};
pub use store::{JurisdictionHierarchy, Reachability};
