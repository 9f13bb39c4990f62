//! Blob storage provider implementations.

pub mod local;

use std::sync::Arc;

use tracing::info;

use pathvault_core::config::StorageConfig;
use pathvault_core::error::AppError;
use pathvault_core::result::AppResult;
use pathvault_core::traits::BlobStorage;

pub use local::LocalBlobStorage;

/// Open the blob provider selected by configuration.
pub async fn open_blob_storage(config: &StorageConfig) -> AppResult<Arc<dyn BlobStorage>> {
    match config.provider.as_str() {
        "local" => {
            info!(root = %config.local.root_path, "Using local blob storage");
            Ok(Arc::new(LocalBlobStorage::new(&config.local.root_path).await?))
        }
        other => Err(AppError::configuration(format!(
            "Unknown storage provider: {other}"
        ))),
    }
}
