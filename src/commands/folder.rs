//! Folder CLI commands.

use clap::Args;

use pathvault_core::error::AppError;
use pathvault_service::folder::CreateFolderRequest;

use super::App;
use crate::output::{self, OutputFormat};

/// Arguments for `mkdir`
#[derive(Debug, Args)]
pub struct MkdirArgs {
    /// Folder name
    pub name: String,

    /// Containing folder
    #[arg(short, long, default_value = "/")]
    pub parent: String,

    /// Pick a free name instead of failing when the name is taken
    #[arg(long)]
    pub ignore_duplicate: bool,
}

/// Create a folder
pub async fn mkdir(app: &App, args: &MkdirArgs) -> Result<(), AppError> {
    let folder = app
        .services
        .folders
        .create_folder(
            &app.ctx,
            CreateFolderRequest {
                name: args.name.clone(),
                folder_path: args.parent.clone(),
                ignore_duplicate: args.ignore_duplicate,
            },
        )
        .await?;

    match app.format {
        OutputFormat::Table => output::print_success(&format!(
            "Folder '{}' created (id: {})",
            folder.full_path(),
            folder.id
        )),
        OutputFormat::Json => output::print_record(&folder, app.format),
    }
    Ok(())
}

/// Print the folder tree
pub async fn tree(app: &App) -> Result<(), AppError> {
    let tree = app.services.folders.folder_tree(&app.ctx).await?;
    match app.format {
        OutputFormat::Table => {
            print!("{}", output::render_tree(&tree.root));
            println!("{} folders", tree.total_folders);
        }
        OutputFormat::Json => output::print_item(&tree, app.format),
    }
    Ok(())
}
