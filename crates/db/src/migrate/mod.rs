//! Forward/backward schema migration runner.
//!
//! Each change unit is named `YYYYMMDDHHMMSS_description` and applied at most
//! once, in name order. Applied names are recorded in `schema_migrations`.
//! A SQL unit and its log row commit in one transaction; a repair unit runs
//! its batch job first and is recorded afterwards.
//!
//! Runs hold a PostgreSQL advisory lock so two processes never migrate the
//! same database at the same time.

mod log;

use sqlx::pool::PoolConnection;
use sqlx::{Connection, FromRow, PgPool, Postgres};
use studyconnect_core::types::Timestamp;

use crate::repair::RepairJob;

pub use log::MIGRATIONS;

/// Advisory lock key held for the duration of a migration run.
pub const MIGRATION_LOCK_ID: i64 = 734_205_118;

/// Forward operation of a change unit.
#[derive(Debug, Clone, Copy)]
pub enum Forward {
    /// One or more SQL statements, run in a single transaction.
    Sql(&'static str),
    /// A one-shot batch correction over existing rows.
    Repair(RepairJob),
}

/// Reverse operation of a change unit.
#[derive(Debug, Clone, Copy)]
pub enum Reverse {
    Sql(&'static str),
    /// The unit cannot be undone without losing data.
    Irreversible { reason: &'static str },
}

/// A single entry of the migration log.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub name: &'static str,
    pub up: Forward,
    pub down: Reverse,
}

impl Migration {
    pub fn is_reversible(&self) -> bool {
        matches!(self.down, Reverse::Sql(_))
    }

    /// The 14-digit timestamp prefix of the name.
    pub fn timestamp(&self) -> &'static str {
        let name: &'static str = self.name;
        &name[..TIMESTAMP_LEN.min(name.len())]
    }
}

const TIMESTAMP_LEN: usize = 14;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Invalid migration name '{0}': expected YYYYMMDDHHMMSS_description")]
    InvalidName(&'static str),

    #[error("Migration '{later}' must sort after '{earlier}'")]
    OutOfOrder {
        earlier: &'static str,
        later: &'static str,
    },

    #[error("Migration '{name}' failed: {source}")]
    StepFailed {
        name: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Migration '{name}' cannot be reverted: {reason}")]
    Irreversible {
        name: &'static str,
        reason: &'static str,
    },

    #[error("Applied migration '{0}' is not part of this build's migration log")]
    UnknownApplied(String),

    #[error("Pending migration '{pending}' predates applied migration '{applied}'")]
    PendingBeforeApplied {
        pending: &'static str,
        applied: String,
    },

    #[error("Unknown migration '{0}'")]
    UnknownTarget(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A row of `schema_migrations`.
#[derive(Debug, Clone, FromRow)]
pub struct AppliedMigration {
    pub name: String,
    pub applied_at: Timestamp,
}

/// State of one log entry against a database.
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    pub name: &'static str,
    pub reversible: bool,
    pub applied_at: Option<Timestamp>,
}

/// Applies and reverts entries of a validated migration log.
#[derive(Debug, Clone, Copy)]
pub struct Migrator {
    migrations: &'static [Migration],
}

impl Default for Migrator {
    /// The built-in log; its ordering is checked by this module's tests.
    fn default() -> Self {
        Self {
            migrations: MIGRATIONS,
        }
    }
}

impl Migrator {
    /// Wrap a log after checking names are well formed and strictly ascending.
    pub fn new(migrations: &'static [Migration]) -> Result<Self, MigrationError> {
        validate_log(migrations)?;
        Ok(Self { migrations })
    }

    pub fn migrations(&self) -> &'static [Migration] {
        self.migrations
    }

    fn find(&self, name: &str) -> Result<&'static Migration, MigrationError> {
        self.migrations
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| MigrationError::UnknownTarget(name.to_string()))
    }

    /// Every log entry with its applied timestamp, if any.
    pub async fn status(&self, pool: &PgPool) -> Result<Vec<MigrationStatus>, MigrationError> {
        ensure_log_table(pool).await?;
        let applied = applied_migrations(pool).await?;
        Ok(self
            .migrations
            .iter()
            .map(|m| MigrationStatus {
                name: m.name,
                reversible: m.is_reversible(),
                applied_at: applied
                    .iter()
                    .find(|a| a.name == m.name)
                    .map(|a| a.applied_at),
            })
            .collect())
    }

    /// Apply every pending entry. Returns the names applied, in order.
    pub async fn up(&self, pool: &PgPool) -> Result<Vec<&'static str>, MigrationError> {
        self.run_up(pool, None).await
    }

    /// Apply pending entries up to and including `target`.
    pub async fn up_to(
        &self,
        pool: &PgPool,
        target: &str,
    ) -> Result<Vec<&'static str>, MigrationError> {
        let target = self.find(target)?;
        self.run_up(pool, Some(target.name)).await
    }

    /// Revert the most recently applied entry, if any.
    pub async fn down(&self, pool: &PgPool) -> Result<Option<&'static str>, MigrationError> {
        Ok(self.run_down(pool, DownLimit::Steps(1)).await?.into_iter().next())
    }

    /// Revert the latest `steps` applied entries, newest first.
    pub async fn down_steps(
        &self,
        pool: &PgPool,
        steps: usize,
    ) -> Result<Vec<&'static str>, MigrationError> {
        self.run_down(pool, DownLimit::Steps(steps)).await
    }

    /// Revert every applied entry newer than `target`; `target` stays applied.
    pub async fn down_to(
        &self,
        pool: &PgPool,
        target: &str,
    ) -> Result<Vec<&'static str>, MigrationError> {
        let target = self.find(target)?;
        self.run_down(pool, DownLimit::After(target.name)).await
    }

    async fn run_up(
        &self,
        pool: &PgPool,
        target: Option<&'static str>,
    ) -> Result<Vec<&'static str>, MigrationError> {
        ensure_log_table(pool).await?;
        let mut lock = acquire_lock(pool).await?;
        let result = self.apply_pending(&mut lock, pool, target).await;
        release_lock(&mut lock).await?;
        result
    }

    async fn apply_pending(
        &self,
        conn: &mut PoolConnection<Postgres>,
        pool: &PgPool,
        target: Option<&'static str>,
    ) -> Result<Vec<&'static str>, MigrationError> {
        let applied = applied_migrations(pool).await?;
        self.check_history(&applied)?;

        let mut done = Vec::new();
        for migration in self.migrations {
            if target.is_some_and(|t| migration.name > t) {
                break;
            }
            if applied.iter().any(|a| a.name == migration.name) {
                continue;
            }
            apply_one(conn, pool, migration).await?;
            done.push(migration.name);
        }
        Ok(done)
    }

    async fn run_down(
        &self,
        pool: &PgPool,
        limit: DownLimit,
    ) -> Result<Vec<&'static str>, MigrationError> {
        ensure_log_table(pool).await?;
        let mut lock = acquire_lock(pool).await?;
        let result = self.revert_applied(&mut lock, pool, limit).await;
        release_lock(&mut lock).await?;
        result
    }

    async fn revert_applied(
        &self,
        conn: &mut PoolConnection<Postgres>,
        pool: &PgPool,
        limit: DownLimit,
    ) -> Result<Vec<&'static str>, MigrationError> {
        let applied = applied_migrations(pool).await?;
        self.check_history(&applied)?;

        let mut done = Vec::new();
        for record in applied.iter().rev() {
            match limit {
                DownLimit::Steps(n) if done.len() >= n => break,
                DownLimit::After(target) if record.name.as_str() <= target => break,
                _ => {}
            }
            let migration = self.find(&record.name)?;
            revert_one(conn, migration).await?;
            done.push(migration.name);
        }
        Ok(done)
    }

    /// Every applied name must be known, and no pending entry may sort before
    /// the newest applied one.
    fn check_history(&self, applied: &[AppliedMigration]) -> Result<(), MigrationError> {
        for record in applied {
            if !self.migrations.iter().any(|m| m.name == record.name) {
                return Err(MigrationError::UnknownApplied(record.name.clone()));
            }
        }
        if let Some(newest) = applied.last() {
            if let Some(pending) = self
                .migrations
                .iter()
                .find(|m| m.name < newest.name.as_str() && !applied.iter().any(|a| a.name == m.name))
            {
                return Err(MigrationError::PendingBeforeApplied {
                    pending: pending.name,
                    applied: newest.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum DownLimit {
    Steps(usize),
    After(&'static str),
}

/// Check that every name is `YYYYMMDDHHMMSS_description` and that names are
/// strictly ascending.
pub fn validate_log(migrations: &'static [Migration]) -> Result<(), MigrationError> {
    for migration in migrations {
        if !is_valid_name(migration.name) {
            return Err(MigrationError::InvalidName(migration.name));
        }
    }
    for pair in migrations.windows(2) {
        if pair[0].name >= pair[1].name {
            return Err(MigrationError::OutOfOrder {
                earlier: pair[0].name,
                later: pair[1].name,
            });
        }
    }
    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() > TIMESTAMP_LEN + 1
        && bytes[..TIMESTAMP_LEN].iter().all(u8::is_ascii_digit)
        && bytes[TIMESTAMP_LEN] == b'_'
        && name[TIMESTAMP_LEN + 1..]
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

async fn ensure_log_table(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            name       TEXT PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn applied_migrations(pool: &PgPool) -> Result<Vec<AppliedMigration>, sqlx::Error> {
    sqlx::query_as::<_, AppliedMigration>(
        "SELECT name, applied_at FROM schema_migrations ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

/// Take the session-level advisory lock on a dedicated connection.
///
/// The connection is closed rather than pooled when dropped, so a run that
/// is cancelled or fails to unlock still ends the session holding the lock.
async fn acquire_lock(pool: &PgPool) -> Result<PoolConnection<Postgres>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    conn.close_on_drop();
    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(MIGRATION_LOCK_ID)
        .execute(&mut *conn)
        .await?;
    Ok(conn)
}

async fn release_lock(conn: &mut PoolConnection<Postgres>) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(MIGRATION_LOCK_ID)
        .execute(&mut **conn)
        .await?;
    Ok(())
}

async fn apply_one(
    conn: &mut PoolConnection<Postgres>,
    pool: &PgPool,
    migration: &'static Migration,
) -> Result<(), MigrationError> {
    let failed = |source| MigrationError::StepFailed {
        name: migration.name,
        source,
    };

    match migration.up {
        Forward::Sql(sql) => {
            let mut tx = conn.begin().await.map_err(failed)?;
            sqlx::raw_sql(sql).execute(&mut *tx).await.map_err(failed)?;
            record_applied(&mut tx, migration.name)
                .await
                .map_err(failed)?;
            tx.commit().await.map_err(failed)?;
        }
        Forward::Repair(job) => {
            let report = job.run(pool).await.map_err(failed)?;
            tracing::info!(
                migration = migration.name,
                job = report.job,
                scanned = report.scanned,
                corrected = report.corrected,
                failed = report.failed.len(),
                "Repair job finished"
            );
            let mut tx = conn.begin().await.map_err(failed)?;
            record_applied(&mut tx, migration.name)
                .await
                .map_err(failed)?;
            tx.commit().await.map_err(failed)?;
        }
    }

    tracing::info!(migration = migration.name, "Applied migration");
    Ok(())
}

async fn revert_one(
    conn: &mut PoolConnection<Postgres>,
    migration: &'static Migration,
) -> Result<(), MigrationError> {
    let sql = match migration.down {
        Reverse::Sql(sql) => sql,
        Reverse::Irreversible { reason } => {
            tracing::error!(migration = migration.name, reason, "Refusing to revert migration");
            return Err(MigrationError::Irreversible {
                name: migration.name,
                reason,
            });
        }
    };
    let failed = |source| MigrationError::StepFailed {
        name: migration.name,
        source,
    };

    let mut tx = conn.begin().await.map_err(failed)?;
    sqlx::raw_sql(sql).execute(&mut *tx).await.map_err(failed)?;
    sqlx::query("DELETE FROM schema_migrations WHERE name = $1")
        .bind(migration.name)
        .execute(&mut *tx)
        .await
        .map_err(failed)?;
    tx.commit().await.map_err(failed)?;

    tracing::info!(migration = migration.name, "Reverted migration");
    Ok(())
}

async fn record_applied(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    name: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO schema_migrations (name) VALUES ($1)")
        .bind(name)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
