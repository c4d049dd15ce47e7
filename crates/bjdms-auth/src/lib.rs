//! # bjdms-auth
//!
//! Authentication, session, and jurisdiction-scoped authorization core for
//! BJDMS.
//!
//! ## Modules
//!
//! - `jwt`: dual-secret access/refresh token issuance and verification
//! - `password`: Argon2id hashing and password/phone policy
//! - `lockout`: failed-login counting on top of the credential store
//! - `session`: session liveness and revocation markers in the cache
//! - `guard`: per-request bearer token gate
//! - `scope`: jurisdiction subtree checks
//! - `audit`: bounded, non-blocking audit event pipeline
//! - `service`: login, refresh, and logout orchestration

pub mod audit;
pub mod guard;
pub mod jwt;
pub mod lockout;
pub mod password;
pub mod scope;
pub mod service;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

mod deadline;

pub use audit::AuditDispatcher;
pub use guard::AuthGuard;
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenError, TokenType};
pub use lockout::LockoutPolicy;
pub use password::{PasswordHasher, PasswordValidator};
pub use scope::ScopeChecker;
pub use service::{AuthService, LoginResult, LogoutOutcome, RefreshResult};
pub use session::SessionStore;
