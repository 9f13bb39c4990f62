//! Database migration management commands.

use clap::{Args, Subcommand};

use pathvault_core::config::{AppConfig, StoreBackend};
use pathvault_core::error::AppError;
use pathvault_database::DatabasePool;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    if config.database.backend == StoreBackend::Memory {
        output::print_warning("The memory backend has no schema; nothing to migrate.");
        return Ok(());
    }

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            DatabasePool::connect(&config.database).await?.migrate().await?;
            output::print_success("All migrations applied successfully.");
        }
    }
    Ok(())
}
