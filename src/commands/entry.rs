//! Commands addressing a single entry by path.

use clap::Args;
use serde_json::json;

use pathvault_core::error::AppError;
use pathvault_entity::file::FileRecord;

use super::App;
use crate::output::{self, OutputFormat, RecordRow};

/// A single path argument
#[derive(Debug, Args)]
pub struct PathArgs {
    /// Full path, e.g. `/docs/a.txt` or `/docs/sub/`
    pub path: String,
}

/// Arguments for `ls`
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder to list
    #[arg(default_value = "/")]
    pub folder: String,
}

/// Arguments for `rename`
#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Entry to rename
    pub path: String,
    /// New name inside the same folder
    pub new_name: String,
}

/// Arguments for `mv`
#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Entry to move
    pub path: String,
    /// Destination folder
    pub destination: String,
}

/// Arguments for `cp`
#[derive(Debug, Args)]
pub struct CopyArgs {
    /// File to copy
    pub path: String,
    /// Destination folder
    pub destination: String,
}

/// Arguments for `rm`
#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Entry to delete
    pub path: String,
    /// Skip the confirmation prompt for folders
    #[arg(short, long)]
    pub yes: bool,
}

/// List a folder
pub async fn ls(app: &App, args: &LsArgs) -> Result<(), AppError> {
    let records = app.services.files.list_by_folder(&app.ctx, &args.folder).await?;
    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    output::print_list(&rows, app.format);
    Ok(())
}

/// Show one entry
pub async fn stat(app: &App, args: &PathArgs) -> Result<(), AppError> {
    let record = app.services.files.get_by_full_path(&app.ctx, &args.path).await?;
    output::print_record(&record, app.format);
    Ok(())
}

/// Check whether a path exists
pub async fn exists(app: &App, args: &PathArgs) -> Result<(), AppError> {
    let exists = app.services.files.exists(&app.ctx, &args.path).await?;
    match app.format {
        OutputFormat::Table => println!("{exists}"),
        OutputFormat::Json => {
            output::print_item(&json!({ "path": args.path, "exists": exists }), app.format)
        }
    }
    Ok(())
}

/// Rename an entry in place
pub async fn rename(app: &App, args: &RenameArgs) -> Result<(), AppError> {
    let files = &app.services.files;
    let record = files.get_by_full_path(&app.ctx, &args.path).await?;
    let renamed = files.rename(&app.ctx, record.id, &args.new_name).await?;
    report(app, "Renamed", &record.full_path(), &renamed);
    Ok(())
}

/// Move an entry
pub async fn mv(app: &App, args: &MoveArgs) -> Result<(), AppError> {
    let files = &app.services.files;
    let record = files.get_by_full_path(&app.ctx, &args.path).await?;
    let moved = files.move_to(&app.ctx, record.id, &args.destination).await?;
    report(app, "Moved", &record.full_path(), &moved);
    Ok(())
}

/// Copy a file
pub async fn cp(app: &App, args: &CopyArgs) -> Result<(), AppError> {
    let files = &app.services.files;
    let record = files.get_by_full_path(&app.ctx, &args.path).await?;
    let copy = files.clone_file(&app.ctx, record.id, &args.destination).await?;
    report(app, "Copied", &record.full_path(), &copy);
    Ok(())
}

/// Delete an entry, asking first for folders
pub async fn rm(app: &App, args: &RemoveArgs) -> Result<(), AppError> {
    let files = &app.services.files;
    let record = files.get_by_full_path(&app.ctx, &args.path).await?;

    if record.is_folder && !args.yes {
        let contents = app
            .services
            .coordinator
            .contents(&record)
            .await?;
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Delete folder '{}' and the {} entries inside it?",
                record.full_path(),
                contents.len()
            ))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = files.delete(&app.ctx, record.id).await?;
    match app.format {
        OutputFormat::Table => output::print_success(&format!(
            "Deleted '{}' ({removed} records)",
            record.full_path()
        )),
        OutputFormat::Json => output::print_item(
            &json!({ "path": record.full_path(), "deleted": removed }),
            app.format,
        ),
    }
    Ok(())
}

fn report(app: &App, verb: &str, from: &str, record: &FileRecord) {
    match app.format {
        OutputFormat::Table => {
            output::print_success(&format!("{verb} '{from}' to '{}'", record.full_path()))
        }
        OutputFormat::Json => output::print_record(record, app.format),
    }
}
