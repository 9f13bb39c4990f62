//! File download service. Streams blob content looked up by full path.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use pathvault_core::error::AppError;
use pathvault_core::result::AppResult;
use pathvault_core::traits::{BlobStorage, ByteStream};
use pathvault_database::RecordRepository;
use pathvault_entity::file::{FileRecord, RecordFilter};

use crate::context::RequestContext;
use crate::path::{absolute, decode_path};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// How the caller intends to present the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Save as a file.
    #[default]
    Attachment,
    /// Display in place.
    Inline,
}

/// An opened file ready to be streamed.
pub struct Download {
    /// File metadata.
    pub record: FileRecord,
    /// Hex SHA-256 of the content, usable as an entity tag.
    pub checksum: String,
    /// MIME type for the Content-Type header.
    pub content_type: String,
    /// Requested presentation.
    pub disposition: Disposition,
    /// File content.
    pub stream: ByteStream,
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download")
            .field("record", &self.record)
            .field("checksum", &self.checksum)
            .field("content_type", &self.content_type)
            .field("disposition", &self.disposition)
            .finish_non_exhaustive()
    }
}

impl Download {
    /// Value for a Content-Disposition header.
    pub fn content_disposition(&self) -> String {
        match self.disposition {
            Disposition::Attachment => {
                format!("attachment; filename=\"{}\"", self.record.file_name)
            }
            Disposition::Inline => "inline".to_string(),
        }
    }
}

/// Opens stored files for reading.
#[derive(Clone)]
pub struct DownloadService {
    /// Record repository.
    repo: RecordRepository,
    /// Blob storage collaborator.
    blobs: Arc<dyn BlobStorage>,
}

impl std::fmt::Debug for DownloadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadService").finish()
    }
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(repo: RecordRepository, blobs: Arc<dyn BlobStorage>) -> Self {
        Self { repo, blobs }
    }

    /// Open the file at `full_path`. Folders and missing paths are `NotFound`.
    pub async fn open(
        &self,
        ctx: &RequestContext,
        full_path: &str,
        disposition: Disposition,
    ) -> AppResult<Download> {
        let full_path = absolute(full_path);
        let decoded = decode_path(&full_path);
        let not_found = || AppError::not_found(format!("File with path {full_path} not found"));

        let record = self
            .repo
            .find_one(&RecordFilter::at(
                &decoded.file_name,
                &decoded.folder_path,
                ctx.namespace(),
            ))
            .await?
            .filter(|record| !record.is_folder)
            .ok_or_else(not_found)?;
        let blob_ref = record.file_source.clone().ok_or_else(not_found)?;

        let checksum = self.blobs.checksum(&blob_ref).await?;
        let stream = self.blobs.download(&blob_ref).await?;
        let content_type = record
            .mime_type
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        debug!(path = %full_path, blob_ref = %blob_ref, "Opened file for download");
        Ok(Download {
            record,
            checksum,
            content_type,
            disposition,
            stream,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::StreamExt;
    use pathvault_core::error::ErrorKind;
    use pathvault_database::{FieldMapper, MemoryMetadataStore};
    use pathvault_entity::file::NewRecord;
    use pathvault_storage::LocalBlobStorage;

    #[tokio::test]
    async fn test_open_streams_content() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(LocalBlobStorage::new(dir.path()).await.unwrap());
        let repo = RecordRepository::new(
            Arc::new(MemoryMetadataStore::new()),
            Arc::new(FieldMapper::identity()),
        );
        let blob = blobs
            .upload(
                "a.txt",
                Box::pin(futures::stream::iter(vec![Ok::<_, std::io::Error>(
                    Bytes::from_static(b"abc"),
                )])),
            )
            .await
            .unwrap();
        repo.create(NewRecord::file("a.txt", "/docs/").with_source(blob.blob_ref, 3, None))
            .await
            .unwrap();
        repo.create(NewRecord::folder("docs", "/")).await.unwrap();

        let svc = DownloadService::new(repo, blobs);
        let ctx = RequestContext::unscoped();

        let mut download = svc
            .open(&ctx, "docs/a.txt", Disposition::Attachment)
            .await
            .unwrap();
        assert_eq!(download.content_type, DEFAULT_CONTENT_TYPE);
        assert_eq!(download.content_disposition(), "attachment; filename=\"a.txt\"");
        assert_eq!(
            download.checksum,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        let mut content = Vec::new();
        while let Some(chunk) = download.stream.next().await {
            content.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(content, b"abc");

        let err = svc.open(&ctx, "/docs/", Disposition::Inline).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = svc.open(&ctx, "/docs/b.txt", Disposition::Inline).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
