//! Request DTOs.

use serde::Deserialize;
use validator::Validate;

/// `POST /auth/login`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// E.164 phone number.
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `POST /auth/refresh`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Query string of jurisdiction-scoped routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JurisdictionQuery {
    pub jurisdiction_id: Option<String>,
}
