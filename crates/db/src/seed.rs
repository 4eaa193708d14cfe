//! Bootstrap data: the initial administrative account.
//!
//! Seeding is not idempotent. Running it twice without [`unseed_admin`] in
//! between fails on `uq_users_email`, which callers can detect with
//! [`crate::error::is_unique_violation`].

use sqlx::PgPool;
use studyconnect_core::error::CoreError;
use studyconnect_core::password::{hash_password, validate_password_strength};
use studyconnect_core::types::DbId;

use crate::models::enums::UserRole;
use crate::repositories::UserRepo;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@studyconnect.com";
pub const DEFAULT_ADMIN_NAME: &str = "Admin User";

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("{0} must be set to seed the admin account")]
    MissingVar(&'static str),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Credentials for the bootstrap admin.
#[derive(Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AdminSeed {
    /// Read `SEED_ADMIN_EMAIL` (default [`DEFAULT_ADMIN_EMAIL`]) and the
    /// required `SEED_ADMIN_PASSWORD`.
    pub fn from_env() -> Result<Self, SeedError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SeedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let password = lookup("SEED_ADMIN_PASSWORD")
            .filter(|p| !p.is_empty())
            .ok_or(SeedError::MissingVar("SEED_ADMIN_PASSWORD"))?;
        let email = lookup("SEED_ADMIN_EMAIL")
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string());
        Ok(Self {
            name: DEFAULT_ADMIN_NAME.to_string(),
            email,
            password,
        })
    }
}

/// Insert the admin user and its default preferences in one transaction.
///
/// Returns the new user's id.
pub async fn seed_admin(pool: &PgPool, seed: &AdminSeed) -> Result<DbId, SeedError> {
    validate_password_strength(&seed.password)?;
    let password_hash = hash_password(&seed.password)?;

    let mut tx = pool.begin().await?;

    let (user_id,): (DbId,) = sqlx::query_as(
        "INSERT INTO users (name, email, password_hash, role, is_active)
         VALUES ($1, $2, $3, $4, true)
         RETURNING id",
    )
    .bind(&seed.name)
    .bind(&seed.email)
    .bind(&password_hash)
    .bind(UserRole::Admin)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO user_preferences (user_id) VALUES ($1)")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(user_id = %user_id, email = %seed.email, "Seeded admin account");
    Ok(user_id)
}

/// Remove the admin account by email. Its preferences go with it.
///
/// Returns `true` if an account was removed.
pub async fn unseed_admin(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let removed = UserRepo::delete_by_email(pool, email).await?;
    if removed {
        tracing::info!(email, "Removed seeded admin account");
    } else {
        tracing::warn!(email, "No seeded admin account to remove");
    }
    Ok(removed)
}
