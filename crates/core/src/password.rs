//! Credential hashing for stored accounts.
//!
//! Hashes are Argon2id in PHC string form, so the salt and cost parameters
//! travel with the hash inside `users.password_hash`.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::CoreError;

/// Minimum accepted length for a plaintext password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a plaintext password with a freshly generated salt.
pub fn hash_password(password: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::Credential(format!("Password hashing failed: {e}")))
}

/// Check a plaintext password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; a malformed stored hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, CoreError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| CoreError::Credential(format!("Stored password hash is malformed: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CoreError::Credential(format!(
            "Password verification failed: {e}"
        ))),
    }
}

/// Reject passwords shorter than [`MIN_PASSWORD_LENGTH`].
pub fn validate_password_strength(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_argon2id_phc_string() {
        let hash = hash_password("study-hard-2024").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn matching_password_verifies() {
        let hash = hash_password("study-hard-2024").unwrap();
        assert!(verify_password("study-hard-2024", &hash).unwrap());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("study-hard-2024").unwrap();
        assert!(!verify_password("study-less", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn short_password_fails_strength_check() {
        let err = validate_password_strength("short").unwrap_err();
        assert!(err.to_string().contains("at least 8 characters"));
        assert!(validate_password_strength("long-enough").is_ok());
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }
}
