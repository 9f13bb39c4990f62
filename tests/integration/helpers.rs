//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use tempfile::TempDir;

use pathvault_core::config::{AppConfig, StoreBackend};
use pathvault_core::traits::ByteStream;
use pathvault_database::MemoryMetadataStore;
use pathvault_entity::file::{FileRecord, RecordFilter};
use pathvault_service::file::UploadRequest;
use pathvault_service::folder::CreateFolderRequest;
use pathvault_service::{Disposition, RequestContext, Services};
use pathvault_storage::LocalBlobStorage;

/// Test application context
pub struct TestApp {
    /// Wired services over an in-memory store and a temporary blob root
    pub services: Services,
    /// Unscoped request context
    pub ctx: RequestContext,
    /// Blob root, removed on drop
    pub blob_dir: TempDir,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application after adjusting the configuration
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let blob_dir = tempfile::tempdir().expect("Failed to create blob dir");

        let mut config = AppConfig::default();
        config.database.backend = StoreBackend::Memory;
        config.storage.local.root_path = blob_dir.path().to_string_lossy().to_string();
        adjust(&mut config);

        let store = Arc::new(MemoryMetadataStore::new());
        let blobs = Arc::new(
            LocalBlobStorage::new(blob_dir.path())
                .await
                .expect("Failed to init blob storage"),
        );
        let services = Services::assemble(&config, store, blobs).expect("Failed to assemble");
        let ctx = services.context(None);

        Self {
            services,
            ctx,
            blob_dir,
        }
    }

    /// Context for another namespace
    pub fn tenant(&self, namespace: &str) -> RequestContext {
        self.services.context(Some(namespace.to_string()))
    }

    /// Create a folder, failing the test on error
    pub async fn mkdir(&self, ctx: &RequestContext, name: &str, parent: &str) -> FileRecord {
        self.services
            .folders
            .create_folder(
                ctx,
                CreateFolderRequest {
                    name: name.into(),
                    folder_path: parent.into(),
                    ignore_duplicate: false,
                },
            )
            .await
            .expect("Failed to create folder")
    }

    /// Upload in-memory content, failing the test on error
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        folder: &str,
        name: &str,
        content: &'static [u8],
    ) -> FileRecord {
        self.services
            .files
            .upload(ctx, upload_request(folder, name), body(content))
            .await
            .expect("Failed to upload")
    }

    /// Download the file at `path` into memory
    pub async fn read(&self, ctx: &RequestContext, path: &str) -> Vec<u8> {
        let mut download = self
            .services
            .downloads
            .open(ctx, path, Disposition::Attachment)
            .await
            .expect("Failed to open download");
        let mut content = Vec::new();
        while let Some(chunk) = download.stream.next().await {
            content.extend_from_slice(&chunk.expect("Failed to read chunk"));
        }
        content
    }

    /// Full paths of every record in the context's namespace, sorted
    pub async fn paths(&self, ctx: &RequestContext) -> Vec<String> {
        let mut paths: Vec<String> = self
            .services
            .coordinator
            .repository()
            .find_many(&RecordFilter::new().namespace(ctx.namespace()))
            .await
            .expect("Failed to list records")
            .iter()
            .map(FileRecord::full_path)
            .collect();
        paths.sort();
        paths
    }

    /// Number of blob files on disk
    pub fn blob_count(&self) -> usize {
        std::fs::read_dir(self.blob_dir.path())
            .expect("Failed to read blob dir")
            .count()
    }
}

/// An upload request with the service's default conflict policy
pub fn upload_request(folder: &str, name: &str) -> UploadRequest {
    UploadRequest {
        folder_path: folder.into(),
        file_name: name.into(),
        mime_type: None,
        policy: None,
    }
}

/// A single-chunk byte stream
pub fn body(content: &'static [u8]) -> ByteStream {
    Box::pin(futures::stream::iter(vec![Ok::<_, std::io::Error>(
        Bytes::from_static(content),
    )]))
}
