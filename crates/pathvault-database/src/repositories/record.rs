//! Typed record repository over a metadata store.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use pathvault_core::error::AppError;
use pathvault_core::result::AppResult;
use pathvault_core::traits::MetadataStore;
use pathvault_core::types::{Document, RecordId};
use pathvault_entity::file::{FileRecord, NewRecord, RecordFilter, RecordPatch, fields};

use crate::mapping::FieldMapper;

/// Repository for file and folder records.
///
/// Converts between typed records and storage documents, applying the
/// configured [`FieldMapper`] in both directions.
#[derive(Debug, Clone)]
pub struct RecordRepository {
    store: Arc<dyn MetadataStore>,
    mapper: Arc<FieldMapper>,
}

impl RecordRepository {
    /// Create a new record repository.
    pub fn new(store: Arc<dyn MetadataStore>, mapper: Arc<FieldMapper>) -> Self {
        Self { store, mapper }
    }

    /// The field mapper applied at the store boundary.
    pub fn mapper(&self) -> &FieldMapper {
        &self.mapper
    }

    /// Name of the underlying store backend.
    pub fn backend_type(&self) -> &str {
        self.store.backend_type()
    }

    /// Insert a new record, assigning its identifier and timestamps.
    pub async fn create(&self, new: NewRecord) -> AppResult<FileRecord> {
        let now = Utc::now();
        let record = FileRecord {
            id: RecordId::new(),
            file_name: new.file_name,
            folder_path: new.folder_path,
            is_folder: new.is_folder,
            mime_type: new.mime_type,
            size_in_bytes: new.size_in_bytes,
            file_source: new.file_source,
            namespace: new.namespace,
            created_at: now,
            updated_at: now,
        };
        let stored = self.store.create(self.to_document(&record)?).await?;
        debug!(id = %record.id, path = %record.full_path(), "Created record");
        self.from_document(stored)
    }

    /// Find the first record matching a filter.
    pub async fn find_one(&self, filter: &RecordFilter) -> AppResult<Option<FileRecord>> {
        let filter = self.to_document(filter)?;
        self.store
            .find_one(&filter)
            .await?
            .map(|document| self.from_document(document))
            .transpose()
    }

    /// Find a record by identifier within a namespace.
    pub async fn find_by_id(
        &self,
        id: RecordId,
        namespace: Option<&str>,
    ) -> AppResult<Option<FileRecord>> {
        self.find_one(&RecordFilter::new().id(id).namespace(namespace))
            .await
    }

    /// Find every record matching a filter.
    pub async fn find_many(&self, filter: &RecordFilter) -> AppResult<Vec<FileRecord>> {
        let filter = self.to_document(filter)?;
        self.store
            .find_many(&filter)
            .await?
            .into_iter()
            .map(|document| self.from_document(document))
            .collect()
    }

    /// Delete every record matching a filter. Returns the count removed.
    pub async fn delete_many(&self, filter: &RecordFilter) -> AppResult<u64> {
        let filter = self.guarded_filter(filter, "delete")?;
        self.store.delete_many(&filter).await
    }

    /// Apply a patch to every record matching a filter. Returns the count updated.
    pub async fn update_many(&self, filter: &RecordFilter, patch: &RecordPatch) -> AppResult<u64> {
        if patch.is_empty() {
            return Ok(0);
        }
        let filter = self.guarded_filter(filter, "update")?;
        let mut patch = self.to_document(patch)?;
        patch.insert(
            self.mapper.storage_name(fields::UPDATED_AT).to_string(),
            serde_json::to_value(Utc::now())?,
        );
        self.store.update_many(&filter, &patch).await
    }

    fn guarded_filter(&self, filter: &RecordFilter, operation: &str) -> AppResult<Document> {
        let document = self.to_document(filter)?;
        if document.is_empty() {
            return Err(AppError::internal(format!(
                "Refusing to {operation} records with an empty filter"
            )));
        }
        Ok(document)
    }

    fn to_document<T: Serialize>(&self, value: &T) -> AppResult<Document> {
        match serde_json::to_value(value)? {
            Value::Object(document) => Ok(self.mapper.to_storage(document)),
            other => Err(AppError::internal(format!(
                "Expected an object document, got {other}"
            ))),
        }
    }

    fn from_document<T: DeserializeOwned>(&self, document: Document) -> AppResult<T> {
        let document = self.mapper.to_logical(document);
        Ok(serde_json::from_value(Value::Object(document))?)
    }
}
