//! StudyConnect data-access layer: schema, migration log, repositories,
//! seed data and repair jobs.

use sqlx::postgres::PgPoolOptions;

pub mod config;
pub mod error;
pub mod migrate;
pub mod models;
pub mod repair;
pub mod repositories;
pub mod schema;
pub mod seed;

pub use config::DbConfig;
pub use migrate::{MigrationError, Migrator};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from the given settings.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    tracing::debug!(?config, "Opening database pool");
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options())
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply every pending migration in the built-in log.
pub async fn run_migrations(pool: &DbPool) -> Result<Vec<&'static str>, MigrationError> {
    Migrator::default().up(pool).await
}
