//! Configuration CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use pathvault_core::config::{AppConfig, StoreBackend};
use pathvault_core::error::AppError;

use super::App;
use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Summarize the configuration and check the field mappings
    Validate,
}

/// Field mapping display row
#[derive(Debug, Serialize, Tabled)]
struct MappingRow {
    /// Logical field name
    logical: String,
    /// Storage field name
    storage: String,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.database.url = mask_password(&shown.database.url);
            output::print_item(&shown, format);
        }
        ConfigCommand::Validate => {
            pathvault_database::FieldMapper::new(&config.field_mappings)?;
            output::print_success("Configuration is valid");
            let backend = match config.database.backend {
                StoreBackend::Postgres => mask_password(&config.database.url),
                StoreBackend::Memory => "memory".to_string(),
            };
            output::print_kv("store", &backend);
            output::print_kv(
                "blobs",
                &format!("{} ({})", config.storage.provider, config.storage.local.root_path),
            );
            output::print_kv("cascade", &format!("{:?}", config.hierarchy.cascade));
            output::print_kv(
                "conflicts",
                &format!("{:?}", config.hierarchy.default_conflict_policy),
            );
            output::print_kv(
                "namespace",
                config.hierarchy.namespace.as_deref().unwrap_or("-"),
            );
        }
    }
    Ok(())
}

/// Print the configured field mappings
pub fn mappings(app: &App) -> Result<(), AppError> {
    let rows: Vec<MappingRow> = app
        .services
        .files
        .field_mappings()
        .into_iter()
        .map(|(logical, storage)| MappingRow { logical, storage })
        .collect();
    output::print_list(&rows, app.format);
    Ok(())
}

/// Mask password in database URL for display
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****{}", &url[..colon_pos], &url[at_pos..]);
            }
        }
    }
    url.to_string()
}
