//! User credential entity and its store.

pub mod model;
pub mod phone;
pub mod store;

pub use model::{FailedAttemptOutcome, User, UserProfile};
pub use phone::{is_valid_phone, mask_phone};
pub use store::CredentialStore;
