use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "studyconnect")]
#[command(author, version, about = "StudyConnect database administration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply, revert or inspect schema migrations
    #[command(subcommand)]
    Migrate(MigrateCommand),

    /// Insert or remove the bootstrap admin account
    #[command(subcommand)]
    Seed(SeedCommand),

    /// Run a one-shot data repair job
    #[command(subcommand)]
    Repair(RepairCommand),

    /// Check that the database is reachable
    Check,
}

#[derive(Subcommand)]
pub enum MigrateCommand {
    /// Apply pending migrations
    Up {
        /// Stop after applying this migration
        #[arg(long)]
        to: Option<String>,
    },

    /// Revert applied migrations (the latest one by default)
    Down(DownArgs),

    /// List every migration and when it was applied
    Status,
}

#[derive(Args)]
pub struct DownArgs {
    /// Revert everything applied after this migration
    #[arg(long, conflicts_with = "steps")]
    pub to: Option<String>,

    /// Number of migrations to revert
    #[arg(long, conflicts_with = "to")]
    pub steps: Option<usize>,
}

#[derive(Subcommand)]
pub enum SeedCommand {
    /// Create the admin account from SEED_ADMIN_EMAIL / SEED_ADMIN_PASSWORD
    Up,
    /// Delete the admin account
    Down,
}

#[derive(Subcommand)]
pub enum RepairCommand {
    /// Classify resources that carry a URL as links
    ResourceTypes,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_args(argv: &[&str]) -> Result<DownArgs, clap::Error> {
        let cli = Cli::try_parse_from(argv)?;
        match cli.command {
            Commands::Migrate(MigrateCommand::Down(args)) => Ok(args),
            _ => panic!("expected migrate down"),
        }
    }

    #[test]
    fn down_accepts_either_target_or_steps() {
        let args = down_args(&["studyconnect", "migrate", "down", "--steps", "3"]).unwrap();
        assert_eq!(args.steps, Some(3));
        assert!(args.to.is_none());

        let args = down_args(&[
            "studyconnect",
            "migrate",
            "down",
            "--to",
            "20240101000016_create_resources",
        ])
        .unwrap();
        assert_eq!(args.to.as_deref(), Some("20240101000016_create_resources"));
    }

    #[test]
    fn down_rejects_target_with_steps() {
        let err = down_args(&[
            "studyconnect",
            "migrate",
            "down",
            "--to",
            "20240101000016_create_resources",
            "--steps",
            "2",
        ])
        .err()
        .expect("conflicting flags must fail to parse");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
