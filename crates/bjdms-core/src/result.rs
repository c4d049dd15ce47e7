//! Convenience result type alias for BJDMS.

use crate::error::AppError;

/// A specialized `Result` type for BJDMS operations.
pub type AppResult<T> = Result<T, AppError>;
