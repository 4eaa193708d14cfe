mod cli;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studyconnect_db::repair::RepairJob;
use studyconnect_db::seed::{self, AdminSeed};
use studyconnect_db::{DbConfig, DbPool, Migrator};

use cli::{Cli, Commands, DownArgs, MigrateCommand, RepairCommand, SeedCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // --- Tracing ---
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "studyconnect=info,sqlx=warn".into());
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Database ---
    let config = DbConfig::from_env().context("Invalid database configuration")?;
    let pool = studyconnect_db::create_pool(&config)
        .await
        .context("Failed to connect to database")?;
    tracing::debug!(host = %config.host, database = %config.database, "Database pool created");

    match cli.command {
        Commands::Migrate(cmd) => migrate(&pool, cmd).await,
        Commands::Seed(cmd) => seed(&pool, cmd).await,
        Commands::Repair(RepairCommand::ResourceTypes) => {
            repair(&pool, RepairJob::ResourceTypes).await
        }
        Commands::Check => {
            studyconnect_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            tracing::info!("Database health check passed");
            Ok(())
        }
    }
}

async fn migrate(pool: &DbPool, cmd: MigrateCommand) -> anyhow::Result<()> {
    let migrator = Migrator::default();
    match cmd {
        MigrateCommand::Up { to } => {
            let applied = match to.as_deref() {
                Some(target) => migrator.up_to(pool, target).await?,
                None => migrator.up(pool).await?,
            };
            tracing::info!(count = applied.len(), "Migrations applied");
        }
        MigrateCommand::Down(DownArgs { to, steps }) => {
            let reverted = match (to.as_deref(), steps) {
                (Some(target), None) => migrator.down_to(pool, target).await?,
                (Some(_), Some(_)) => anyhow::bail!("--to and --steps cannot be combined"),
                (None, Some(steps)) => migrator.down_steps(pool, steps).await?,
                (None, None) => migrator.down(pool).await?.into_iter().collect(),
            };
            tracing::info!(count = reverted.len(), "Migrations reverted");
        }
        MigrateCommand::Status => {
            for status in migrator.status(pool).await? {
                let applied = status
                    .applied_at
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_else(|| "pending".to_string());
                let marker = if status.reversible { "" } else { " (irreversible)" };
                println!("{:<55} {applied}{marker}", status.name);
            }
        }
    }
    Ok(())
}

async fn seed(pool: &DbPool, cmd: SeedCommand) -> anyhow::Result<()> {
    match cmd {
        SeedCommand::Up => {
            let admin = AdminSeed::from_env()?;
            seed::seed_admin(pool, &admin)
                .await
                .with_context(|| format!("Failed to seed admin account {}", admin.email))?;
        }
        SeedCommand::Down => {
            let email = std::env::var("SEED_ADMIN_EMAIL")
                .ok()
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| seed::DEFAULT_ADMIN_EMAIL.to_string());
            seed::unseed_admin(pool, &email).await?;
        }
    }
    Ok(())
}

async fn repair(pool: &DbPool, job: RepairJob) -> anyhow::Result<()> {
    let report = job
        .run(pool)
        .await
        .with_context(|| format!("Repair job {} failed", job.name()))?;
    if !report.is_complete() {
        anyhow::bail!(
            "Repair job {} left {} of {} rows uncorrected",
            report.job,
            report.failed.len(),
            report.scanned
        );
    }
    Ok(())
}
