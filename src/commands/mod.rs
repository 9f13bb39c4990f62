//! CLI command definitions and dispatch.

pub mod config;
pub mod entry;
pub mod folder;
pub mod migrate;
pub mod transfer;

use clap::{Parser, Subcommand};

use pathvault_core::config::AppConfig;
use pathvault_core::error::AppError;
use pathvault_service::{RequestContext, Services};

use crate::output::OutputFormat;

/// PathVault: a folder hierarchy over a flat metadata store
#[derive(Debug, Parser)]
#[command(name = "pathvault", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded next to the configuration file
    #[arg(short, long, env = "PATHVAULT_ENV")]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Tenant namespace; falls back to `hierarchy.namespace`
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a folder
    Mkdir(folder::MkdirArgs),
    /// Print the folder tree
    Tree,
    /// List a folder
    Ls(entry::LsArgs),
    /// Show one entry
    Stat(entry::PathArgs),
    /// Check whether a path exists
    Exists(entry::PathArgs),
    /// Rename a file or folder in place
    Rename(entry::RenameArgs),
    /// Move a file or folder to another folder
    Mv(entry::MoveArgs),
    /// Copy a file to another folder
    Cp(entry::CopyArgs),
    /// Delete a file or folder
    Rm(entry::RemoveArgs),
    /// Upload a local file
    Upload(transfer::UploadArgs),
    /// Download a file
    Download(transfer::DownloadArgs),
    /// Show the configured field mappings
    Mappings,
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => return migrate::execute(args, &config).await,
            Commands::Config(args) => return config::execute(args, &config, self.format),
            _ => {}
        }

        let services = Services::from_config(&config).await?;
        let ctx = services.context(self.namespace.clone());
        let app = App {
            services,
            ctx,
            format: self.format,
        };

        match &self.command {
            Commands::Mkdir(args) => folder::mkdir(&app, args).await,
            Commands::Tree => folder::tree(&app).await,
            Commands::Ls(args) => entry::ls(&app, args).await,
            Commands::Stat(args) => entry::stat(&app, args).await,
            Commands::Exists(args) => entry::exists(&app, args).await,
            Commands::Rename(args) => entry::rename(&app, args).await,
            Commands::Mv(args) => entry::mv(&app, args).await,
            Commands::Cp(args) => entry::cp(&app, args).await,
            Commands::Rm(args) => entry::rm(&app, args).await,
            Commands::Upload(args) => transfer::upload(&app, args).await,
            Commands::Download(args) => transfer::download(&app, args).await,
            Commands::Mappings => config::mappings(&app),
            Commands::Migrate(_) | Commands::Config(_) => Ok(()),
        }
    }
}

/// Everything a data command needs.
pub struct App {
    /// Wired services
    pub services: Services,
    /// Request context for this invocation
    pub ctx: RequestContext,
    /// Output format
    pub format: OutputFormat,
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str, env: Option<&str>) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path, env)
}
