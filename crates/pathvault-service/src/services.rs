//! Service wiring.

use std::sync::Arc;

use tracing::info;

use pathvault_core::config::AppConfig;
use pathvault_core::result::AppResult;
use pathvault_core::traits::{BlobStorage, MetadataStore};
use pathvault_database::{FieldMapper, RecordRepository, open_store};
use pathvault_storage::open_blob_storage;

use crate::context::RequestContext;
use crate::coordinator::MutationCoordinator;
use crate::file::{DownloadService, FileService};
use crate::folder::FolderService;

/// The full service set sharing one store, blob backend, and field mapper.
#[derive(Debug, Clone)]
pub struct Services {
    /// Structural mutations.
    pub coordinator: Arc<MutationCoordinator>,
    /// File operations.
    pub files: FileService,
    /// Folder operations.
    pub folders: FolderService,
    /// Downloads.
    pub downloads: DownloadService,
    /// Namespace used when a request names none.
    default_namespace: Option<String>,
}

impl Services {
    /// Open the configured backends and build the services.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let store = open_store(&config.database).await?;
        let blobs = open_blob_storage(&config.storage).await?;
        Self::assemble(config, store, blobs)
    }

    /// Build the services over already opened backends.
    pub fn assemble(
        config: &AppConfig,
        store: Arc<dyn MetadataStore>,
        blobs: Arc<dyn BlobStorage>,
    ) -> AppResult<Self> {
        let mapper = Arc::new(FieldMapper::new(&config.field_mappings)?);
        let repo = RecordRepository::new(store, mapper);
        let hierarchy = &config.hierarchy;

        info!(
            store = repo.backend_type(),
            blobs = blobs.provider_type(),
            cascade = ?hierarchy.cascade,
            conflict_policy = ?hierarchy.default_conflict_policy,
            "Assembling services"
        );

        let coordinator = Arc::new(MutationCoordinator::new(repo.clone(), hierarchy.cascade));
        Ok(Self {
            files: FileService::new(
                coordinator.clone(),
                blobs.clone(),
                hierarchy.default_conflict_policy,
            ),
            folders: FolderService::new(coordinator.clone()),
            downloads: DownloadService::new(repo, blobs),
            coordinator,
            default_namespace: hierarchy.namespace.clone(),
        })
    }

    /// Request context for `requested`, or the configured default namespace.
    pub fn context(&self, requested: Option<String>) -> RequestContext {
        RequestContext::resolve(requested, self.default_namespace.as_deref())
    }
}
