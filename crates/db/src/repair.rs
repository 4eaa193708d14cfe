//! One-shot batch corrections over existing rows.
//!
//! A repair job is separate from schema changes: it scans for rows in a
//! known-bad state and fixes them one at a time, with no transaction spanning
//! rows. A row that fails is logged and counted and the job moves on, so a
//! partial run leaves a subset corrected. Every job is safe to re-run: the
//! scan only selects rows that still need the fix, and each update re-checks
//! the predicate.

use sqlx::PgPool;
use studyconnect_core::types::DbId;

use crate::models::enums::ResourceType;

/// Known repair jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairJob {
    /// Classify every resource with a non-empty `url` as `Link`.
    ResourceTypes,
}

impl RepairJob {
    pub fn name(self) -> &'static str {
        match self {
            Self::ResourceTypes => "resource_types",
        }
    }

    /// Run the job to completion.
    ///
    /// Only a failure to scan is an error; per-row failures are reported in
    /// [`RepairReport::failed`].
    pub async fn run(self, pool: &PgPool) -> Result<RepairReport, sqlx::Error> {
        match self {
            Self::ResourceTypes => repair_resource_types(pool).await,
        }
    }
}

/// Outcome of a repair run.
#[derive(Debug, Clone, Default)]
pub struct RepairReport {
    pub job: &'static str,
    /// Rows that matched the repair predicate.
    pub scanned: usize,
    /// Rows actually rewritten by this run.
    pub corrected: usize,
    /// Rows whose update failed, with the error text.
    pub failed: Vec<(DbId, String)>,
}

impl RepairReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Rewrite `resources.type` to `Link` where `url` is non-empty (ignoring
/// surrounding whitespace) and the type is anything else.
pub async fn repair_resource_types(pool: &PgPool) -> Result<RepairReport, sqlx::Error> {
    let job = RepairJob::ResourceTypes.name();
    let link = ResourceType::Link;

    let candidates: Vec<(DbId,)> = sqlx::query_as(
        "SELECT id FROM resources
         WHERE url IS NOT NULL AND btrim(url) <> '' AND type <> $1
         ORDER BY created_at, id",
    )
    .bind(link)
    .fetch_all(pool)
    .await?;

    let mut report = RepairReport {
        job,
        scanned: candidates.len(),
        ..RepairReport::default()
    };

    for (id,) in candidates {
        let result = sqlx::query(
            "UPDATE resources SET type = $2
             WHERE id = $1 AND url IS NOT NULL AND btrim(url) <> '' AND type <> $2",
        )
        .bind(id)
        .bind(link)
        .execute(pool)
        .await;

        match result {
            Ok(done) => report.corrected += done.rows_affected() as usize,
            Err(e) => {
                tracing::warn!(job, resource_id = %id, error = %e, "Repair of row failed");
                report.failed.push((id, e.to_string()));
            }
        }
    }

    tracing::info!(
        job,
        scanned = report.scanned,
        corrected = report.corrected,
        failed = report.failed.len(),
        "Repair run complete"
    );
    Ok(report)
}
