//! Metadata store implementations.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use tracing::info;

use pathvault_core::config::{DatabaseConfig, StoreBackend};
use pathvault_core::result::AppResult;
use pathvault_core::traits::MetadataStore;

pub use memory::MemoryMetadataStore;
pub use postgres::PgMetadataStore;

use crate::connection::DatabasePool;

/// Open the store selected by configuration.
///
/// PostgreSQL stores are migrated before they are returned.
pub async fn open_store(config: &DatabaseConfig) -> AppResult<Arc<dyn MetadataStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory metadata store");
            Ok(Arc::new(MemoryMetadataStore::new()))
        }
        StoreBackend::Postgres => {
            let pool = DatabasePool::connect(config).await?;
            pool.migrate().await?;
            Ok(Arc::new(PgMetadataStore::new(pool.into_pool())))
        }
    }
}
