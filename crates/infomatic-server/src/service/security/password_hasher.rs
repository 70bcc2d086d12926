//! Secure password hashing and verification using Argon2id.
//!
//! All three principal classes store Argon2id hashes in the PHC string
//! format. Hashing and verification return HTTP errors directly so handlers
//! can propagate them with `?`.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};

use crate::handler::{ErrorKind, Result};

/// Tracing target for password hashing operations.
const TRACING_TARGET_AUTH_HASHER: &str = "infomatic_server::service::auth_hasher";

/// Secure password hashing and verification service using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a new instance of the [`PasswordHasher`] service.
    pub fn new() -> Self {
        let argon2 = Argon2::default();
        Self { argon2 }
    }

    /// Hashes a password using Argon2id with a fresh random salt.
    ///
    /// The returned PHC string includes the algorithm, parameters, salt, and
    /// hash value and can be stored directly in the database.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::InternalServerError` if the hashing operation
    /// fails. The password itself is never logged.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_AUTH_HASHER,
                    error = %e,
                    "password hashing operation failed"
                );

                ErrorKind::InternalServerError
                    .with_message("Password processing failed")
                    .with_context("Hash generation error")
                    .with_resource("authentication")
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// - `ErrorKind::Unauthorized` for incorrect passwords
    /// - `ErrorKind::InternalServerError` for invalid hash format or system
    ///   errors
    ///
    /// The error message does not reveal why verification failed.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET_AUTH_HASHER,
                error = %e,
                "Invalid password hash format provided"
            );

            ErrorKind::InternalServerError
                .with_message("Authentication system temporarily unavailable")
                .with_context("Hash format error")
                .with_resource("authentication")
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(()),
            Err(ArgonError::Password) => {
                tracing::debug!(
                    target: TRACING_TARGET_AUTH_HASHER,
                    "Password verification failed: incorrect password provided"
                );

                Err(ErrorKind::Unauthorized
                    .with_message("Authentication failed")
                    .with_context("Invalid credentials")
                    .with_resource("authentication"))
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_AUTH_HASHER,
                    error = %e,
                    "Password verification system error"
                );

                Err(ErrorKind::InternalServerError
                    .with_message("Authentication temporarily unavailable")
                    .with_context("Verification error")
                    .with_resource("authentication"))
            }
        }
    }

    /// Performs a dummy password verification to maintain consistent timing.
    ///
    /// Used when the looked-up account does not exist or carries no password,
    /// so a login attempt against a missing account takes about as long as
    /// one against a real account. Always returns `false`.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        use rand::Rng;

        let password_len = rand::thread_rng().gen_range(16..32);
        let dummy_password: String = (0..password_len)
            .map(|_| rand::thread_rng().sample(rand::distributions::Alphanumeric) as char)
            .collect();

        // Hash and verify, the verification always fails but takes the same
        // time as a real one.
        if let Ok(dummy_hash) = self.hash_password(&dummy_password) {
            let _ = self.verify_password(password, &dummy_hash);
        }

        false
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
    fn hash_and_verify_password() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let password = "secure_password_123";
        let hash = hasher.hash_password(password)?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password(password, &hash).is_ok());
        assert!(hasher.verify_password("wrong_password", &hash).is_err());

        Ok(())
    }

    #[test]
    fn hash_produces_unique_salts() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let password = "test_password";

        let hash1 = hasher.hash_password(password)?;
        let hash2 = hasher.hash_password(password)?;

        assert_ne!(hash1, hash2);
        assert!(hasher.verify_password(password, &hash1).is_ok());
        assert!(hasher.verify_password(password, &hash2).is_ok());

        Ok(())
    }

    #[test]
    fn wrong_password_is_unauthorized() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("correct_password")?;

        let result = hasher.verify_password("wrong_password", &hash);
        match result {
            Err(error) => assert_eq!(error.kind(), ErrorKind::Unauthorized),
            Ok(()) => panic!("wrong password must not verify"),
        }

        Ok(())
    }

    #[test]
    fn invalid_hash_is_internal_error() {
        let hasher = PasswordHasher::new();

        let result = hasher.verify_password("test_password", "not_a_valid_hash");
        match result {
            Err(error) => assert_eq!(error.kind(), ErrorKind::InternalServerError),
            Ok(()) => panic!("invalid hash must not verify"),
        }
    }

    #[test]
    fn dummy_verification_always_fails() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_dummy_password("any_password"));
    }
}
