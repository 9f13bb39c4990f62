//! Metadata store trait for flat, equality-filtered record storage.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::Document;

/// A flat record store with no notion of hierarchy.
///
/// Every filter is a conjunction of exact-value matches: a stored document
/// matches when it holds every key of the filter with an equal value. No
/// prefix, range, or pattern matching is assumed. Documents arrive here with
/// storage-specific field names already applied.
#[async_trait]
pub trait MetadataStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "memory", "postgres").
    fn backend_type(&self) -> &str;

    /// Persist a new document and return it as stored.
    async fn create(&self, document: Document) -> AppResult<Document>;

    /// Return any one document matching the filter.
    async fn find_one(&self, filter: &Document) -> AppResult<Option<Document>>;

    /// Return every document matching the filter, in unspecified order.
    async fn find_many(&self, filter: &Document) -> AppResult<Vec<Document>>;

    /// Delete every document matching the filter. Returns the count removed.
    async fn delete_many(&self, filter: &Document) -> AppResult<u64>;

    /// Merge `patch` into every document matching the filter. Returns the count updated.
    async fn update_many(&self, filter: &Document, patch: &Document) -> AppResult<u64>;
}
