//! Access and refresh token issuance and verification.
//!
//! Access and refresh tokens are signed with different secrets, so a token of
//! one kind can never verify as the other. Both pin HS256.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod token_id;

pub use claims::{Claims, TokenType};
pub use decoder::JwtDecoder;
pub use encoder::{IssuedToken, JwtEncoder};
pub use error::TokenError;

/// `iss` claim written into and required on every token.
pub const ISSUER: &str = "bjdms-api";
