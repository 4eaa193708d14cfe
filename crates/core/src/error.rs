//! Errors raised before anything reaches the database.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input failed a field check. Holds the human-readable message(s).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Hashing a credential, or parsing a stored hash, failed.
    #[error("Credential error: {0}")]
    Credential(String),
}
