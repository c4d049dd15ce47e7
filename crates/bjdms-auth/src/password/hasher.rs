//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use bjdms_core::error::AppError;

/// Argon2id with fixed parameters (m = 19 MiB, t = 2, p = 1).
///
/// Verification reads the parameters embedded in the stored hash, so hashes
/// produced with other parameters still verify.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Creates a hasher with the production parameters.
    pub fn new() -> Self {
        Self {
            params: Params::DEFAULT,
        }
    }

    /// Cheap parameters so test suites stay fast.
    #[cfg(any(test, feature = "testing"))]
    pub fn for_tests() -> Self {
        Self {
            params: Params::new(1024, 1, 1, None).unwrap_or(Params::DEFAULT),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext password with a random salt, returning a PHC string.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hasher = PasswordHasher::for_tests();
        let hash = hasher.hash_password("Secret123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("Secret123", &hash).unwrap());
        assert!(!hasher.verify_password("Secret124", &hash).unwrap());
    }

    #[test]
    fn production_hasher_verifies_test_hashes() {
        let hash = PasswordHasher::for_tests().hash_password("Secret123").unwrap();
        assert!(PasswordHasher::new().verify_password("Secret123", &hash).unwrap());
    }

    #[test]
    fn corrupt_hash_is_an_error() {
        let hasher = PasswordHasher::for_tests();
        assert!(hasher.verify_password("Secret123", "not-a-hash").is_err());
    }
}
