//! Token verification failures.

use thiserror::Error;

use bjdms_core::error::AppError;

/// Why a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not a well-formed token, wrong claims, or wrong token kind.
    #[error("token is malformed")]
    Malformed,
    /// Signature does not verify under the expected secret and algorithm.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Signature is fine but `exp` has passed.
    #[error("token has expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::InvalidSignature,
            _ => Self::Malformed,
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::expired_token("Token has expired"),
            TokenError::InvalidSignature => AppError::invalid_token("Invalid token signature"),
            TokenError::Malformed => AppError::invalid_token("Invalid token"),
        }
    }
}
