//! Upload and download commands.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use pathvault_core::config::ConflictPolicy;
use pathvault_core::error::AppError;
use pathvault_service::Disposition;
use pathvault_service::file::UploadRequest;

use super::App;
use crate::output::{self, OutputFormat};

/// Conflict policy as a CLI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnConflict {
    /// Store under the next free `name (n).ext`
    Rename,
    /// Replace the existing file
    Overwrite,
    /// Fail
    Reject,
}

impl From<OnConflict> for ConflictPolicy {
    fn from(value: OnConflict) -> Self {
        match value {
            OnConflict::Rename => ConflictPolicy::Rename,
            OnConflict::Overwrite => ConflictPolicy::Overwrite,
            OnConflict::Reject => ConflictPolicy::Reject,
        }
    }
}

/// Arguments for `upload`
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Local file to upload
    pub file: PathBuf,

    /// Target folder
    #[arg(short, long, default_value = "/")]
    pub to: String,

    /// Override file name
    #[arg(long)]
    pub name: Option<String>,

    /// MIME type, guessed from the name when omitted
    #[arg(long)]
    pub mime: Option<String>,

    /// What to do when the name is taken; defaults to `hierarchy.default_conflict_policy`
    #[arg(long, value_enum)]
    pub on_conflict: Option<OnConflict>,
}

/// Arguments for `download`
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// File to download
    pub path: String,

    /// Local destination; defaults to the file name in the current directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Upload a local file
pub async fn upload(app: &App, args: &UploadArgs) -> Result<(), AppError> {
    let file_name = match &args.name {
        Some(name) => name.clone(),
        None => args
            .file
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::invalid_path(format!("No file name in {}", args.file.display()))
            })?,
    };

    let file = tokio::fs::File::open(&args.file).await.map_err(|e| {
        AppError::not_found(format!("Cannot open {}: {e}", args.file.display()))
    })?;

    let record = app
        .services
        .files
        .upload(
            &app.ctx,
            UploadRequest {
                folder_path: args.to.clone(),
                file_name,
                mime_type: args.mime.clone(),
                policy: args.on_conflict.map(ConflictPolicy::from),
            },
            Box::pin(ReaderStream::new(file)),
        )
        .await?;

    match app.format {
        OutputFormat::Table => output::print_success(&format!(
            "Uploaded '{}' ({} bytes, id: {})",
            record.full_path(),
            record.size_in_bytes,
            record.id
        )),
        OutputFormat::Json => output::print_record(&record, app.format),
    }
    Ok(())
}

/// Download a file
pub async fn download(app: &App, args: &DownloadArgs) -> Result<(), AppError> {
    let mut download = app
        .services
        .downloads
        .open(&app.ctx, &args.path, Disposition::Attachment)
        .await?;

    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&download.record.file_name));
    let mut out = tokio::fs::File::create(&target).await?;
    let mut written: u64 = 0;
    while let Some(chunk) = download.stream.next().await {
        let chunk = chunk?;
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    out.flush().await?;

    if app.format == OutputFormat::Table {
        output::print_success(&format!(
            "Downloaded '{}' to {} ({written} bytes)",
            download.record.full_path(),
            target.display()
        ));
        output::print_kv("sha256", &download.checksum);
    } else {
        output::print_item(
            &serde_json::json!({
                "path": download.record.full_path(),
                "target": target.display().to_string(),
                "bytes": written,
                "sha256": download.checksum,
                "contentType": download.content_type,
            }),
            app.format,
        );
    }

    if written != download.record.size_in_bytes {
        output::print_warning(&format!(
            "Size mismatch: metadata says {} bytes",
            download.record.size_in_bytes
        ));
    }
    Ok(())
}
