//! Policy for new passwords and login phone numbers.

use bjdms_core::error::AppError;
use bjdms_entity::user::is_valid_phone;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Validates credentials before they reach the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordValidator;

impl PasswordValidator {
    /// Checks a new password: at least eight characters with an upper-case
    /// letter, a lower-case letter, and a digit.
    ///
    /// Returns the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::validation(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::validation(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }

        Ok(())
    }

    /// Checks the login phone format (`+880` and ten digits).
    pub fn validate_phone(&self, phone: &str) -> Result<(), AppError> {
        if is_valid_phone(phone) {
            Ok(())
        } else {
            Err(AppError::validation(
                "Phone must be in the format +880XXXXXXXXXX",
            ))
        }
    }
}
