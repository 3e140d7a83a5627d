//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config.database_url).await?;

    match args.action {
        MigrateAction::Up => {
            db.migrate_up().await?;
            tracing::info!("Migrations applied");
        }
        MigrateAction::Down => {
            db.migrate_down_one().await?;
            tracing::info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                println!("{:<48} {}", name, if applied { "applied" } else { "pending" });
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running migrations");
            db.migrate_fresh().await?;
            tracing::info!("Fresh migrations applied");
        }
    }

    Ok(())
}
