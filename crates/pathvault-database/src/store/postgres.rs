//! PostgreSQL metadata store.
//!
//! Every record is one JSONB document. Equality filters become JSONB
//! containment (`document @> filter`), which the GIN index on the column
//! serves directly, and patches are applied with the JSONB merge operator.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use pathvault_core::error::{AppError, ErrorKind};
use pathvault_core::result::AppResult;
use pathvault_core::traits::MetadataStore;
use pathvault_core::types::Document;

/// Metadata store backed by the `file_metadata` table.
#[derive(Debug, Clone)]
pub struct PgMetadataStore {
    pool: PgPool,
}

impl PgMetadataStore {
    /// Create a store over an existing, migrated pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::StorageBackend, message, e)
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    fn backend_type(&self) -> &str {
        "postgres"
    }

    async fn create(&self, document: Document) -> AppResult<Document> {
        sqlx::query_scalar::<_, Json<Document>>(
            "INSERT INTO file_metadata (document) VALUES ($1) RETURNING document",
        )
        .bind(Json(&document))
        .fetch_one(&self.pool)
        .await
        .map(|stored| stored.0)
        .map_err(backend_error("Failed to insert record"))
    }

    async fn find_one(&self, filter: &Document) -> AppResult<Option<Document>> {
        sqlx::query_scalar::<_, Json<Document>>(
            "SELECT document FROM file_metadata WHERE document @> $1 LIMIT 1",
        )
        .bind(Json(filter))
        .fetch_optional(&self.pool)
        .await
        .map(|found| found.map(|d| d.0))
        .map_err(backend_error("Failed to find record"))
    }

    async fn find_many(&self, filter: &Document) -> AppResult<Vec<Document>> {
        sqlx::query_scalar::<_, Json<Document>>(
            "SELECT document FROM file_metadata WHERE document @> $1 ORDER BY seq ASC",
        )
        .bind(Json(filter))
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(|d| d.0).collect())
        .map_err(backend_error("Failed to list records"))
    }

    async fn delete_many(&self, filter: &Document) -> AppResult<u64> {
        sqlx::query("DELETE FROM file_metadata WHERE document @> $1")
            .bind(Json(filter))
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected())
            .map_err(backend_error("Failed to delete records"))
    }

    async fn update_many(&self, filter: &Document, patch: &Document) -> AppResult<u64> {
        sqlx::query(
            "UPDATE file_metadata SET document = document || $2, updated_at = NOW() \
             WHERE document @> $1",
        )
        .bind(Json(filter))
        .bind(Json(patch))
        .execute(&self.pool)
        .await
        .map(|result| result.rows_affected())
        .map_err(backend_error("Failed to update records"))
    }
}
