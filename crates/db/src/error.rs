//! Error types for the repository layer.
//!
//! Constraint violations are never rewritten: callers get the original
//! [`sqlx::Error`] and can ask [`constraint_violation`] what kind it was.

use studyconnect_core::error::CoreError;

use crate::schema::RegistryError;

/// Error from a repository operation that validates its input first.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Input rejected before reaching the database.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A query referenced a relation the registry does not know.
    #[error("Schema error: {0}")]
    Schema(#[from] RegistryError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DbError {
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        match self {
            Self::Database(err) => constraint_violation(err),
            Self::Core(_) | Self::Schema(_) => None,
        }
    }
}

/// Storage-level constraint classes, by PostgreSQL SQLSTATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `23505`
    Unique,
    /// `23503`
    ForeignKey,
    /// `23502`
    NotNull,
    /// `23514`
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    /// Constraint name, when PostgreSQL reports one.
    pub constraint: Option<String>,
}

/// Classify `err` as a constraint violation, if it is one.
pub fn constraint_violation(err: &sqlx::Error) -> Option<ConstraintViolation> {
    let db_err = err.as_database_error()?;
    let kind = match db_err.code().as_deref() {
        Some("23505") => ConstraintKind::Unique,
        Some("23503") => ConstraintKind::ForeignKey,
        Some("23502") => ConstraintKind::NotNull,
        Some("23514") => ConstraintKind::Check,
        _ => return None,
    };
    Some(ConstraintViolation {
        kind,
        constraint: db_err.constraint().map(str::to_string),
    })
}

/// True when `err` is a unique violation on the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    matches!(
        constraint_violation(err),
        Some(ConstraintViolation {
            kind: ConstraintKind::Unique,
            constraint: Some(ref name),
        }) if name == constraint
    )
}
