//! Local filesystem blob storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::StreamExt;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};
use uuid::Uuid;

use pathvault_core::error::{AppError, ErrorKind};
use pathvault_core::result::AppResult;
use pathvault_core::traits::{BlobStorage, ByteStream, UploadTicket, UploadedBlob};

/// Blob storage in a flat directory. Each blob is `<uuid><.ext>`.
#[derive(Debug, Clone)]
pub struct LocalBlobStorage {
    root: PathBuf,
}

impl LocalBlobStorage {
    /// Create a blob store rooted at the given directory, creating it if needed.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageBackend,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a blob reference to a file inside the root.
    fn resolve(&self, blob_ref: &str) -> AppResult<PathBuf> {
        if blob_ref.is_empty()
            || blob_ref.contains(['/', '\\'])
            || blob_ref == "."
            || blob_ref == ".."
        {
            return Err(AppError::invalid_path(format!(
                "Invalid blob reference: {blob_ref}"
            )));
        }
        Ok(self.root.join(blob_ref))
    }

    async fn open(&self, blob_ref: &str) -> AppResult<fs::File> {
        let path = self.resolve(blob_ref)?;
        fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {blob_ref}"))
            } else {
                AppError::with_source(
                    ErrorKind::StorageBackend,
                    format!("Failed to open blob: {blob_ref}"),
                    e,
                )
            }
        })
    }
}

/// A fresh blob name keeping the extension of `original_name`.
fn blob_name(original_name: &str) -> String {
    let id = Uuid::new_v4();
    match Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) if !ext.is_empty() => format!("{id}.{ext}"),
        _ => id.to_string(),
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn upload(&self, original_name: &str, mut stream: ByteStream) -> AppResult<UploadedBlob> {
        let blob_ref = blob_name(original_name);
        let path = self.resolve(&blob_ref)?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageBackend,
                format!("Failed to create blob: {blob_ref}"),
                e,
            )
        })?;

        let mut size_in_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let written = match chunk {
                Ok(chunk) => file.write_all(&chunk).await.map(|_| chunk.len() as u64),
                Err(e) => Err(e),
            };
            match written {
                Ok(len) => size_in_bytes += len,
                Err(e) => {
                    drop(file);
                    if let Err(cleanup) = fs::remove_file(&path).await {
                        warn!(blob_ref = %blob_ref, error = %cleanup, "Failed to remove partial blob");
                    }
                    return Err(AppError::with_source(
                        ErrorKind::StorageBackend,
                        format!("Failed to write blob: {blob_ref}"),
                        e,
                    ));
                }
            }
        }

        file.flush().await.map_err(|e| {
            AppError::with_source(ErrorKind::StorageBackend, "Failed to flush blob", e)
        })?;

        debug!(blob_ref = %blob_ref, bytes = size_in_bytes, "Stored blob");
        Ok(UploadedBlob {
            blob_ref,
            size_in_bytes,
        })
    }

    async fn download(&self, blob_ref: &str) -> AppResult<ByteStream> {
        let file = self.open(blob_ref).await?;
        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn delete(&self, blob_ref: &str) -> AppResult<()> {
        let path = self.resolve(blob_ref)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(blob_ref, "Deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::StorageBackend,
                format!("Failed to delete blob: {blob_ref}"),
                e,
            )),
        }
    }

    async fn upload_url(&self, blob_name: &str) -> AppResult<UploadTicket> {
        Err(AppError::not_implemented(format!(
            "Local storage cannot issue upload URLs (requested for {blob_name})"
        )))
    }

    async fn checksum(&self, blob_ref: &str) -> AppResult<String> {
        let mut file = self.open(blob_ref).await?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; 64 * 1024];
        loop {
            let read = file.read(&mut buffer).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::StorageBackend,
                    format!("Failed to read blob: {blob_ref}"),
                    e,
                )
            })?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
        Ok(hex::encode(hasher.finalize()))
    }

    async fn clone_blob(&self, blob_ref: &str) -> AppResult<String> {
        let from = self.resolve(blob_ref)?;
        let copy_ref = blob_name(blob_ref);
        let to = self.resolve(&copy_ref)?;

        fs::copy(&from, &to).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {blob_ref}"))
            } else {
                AppError::with_source(
                    ErrorKind::StorageBackend,
                    format!("Failed to copy blob {blob_ref} -> {copy_ref}"),
                    e,
                )
            }
        })?;

        debug!(from = blob_ref, to = %copy_ref, "Cloned blob");
        Ok(copy_ref)
    }
}
