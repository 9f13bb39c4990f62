//! In-process metadata store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use pathvault_core::result::AppResult;
use pathvault_core::traits::MetadataStore;
use pathvault_core::types::Document;
use pathvault_core::types::document::{matches, merge};

/// Metadata store holding documents in memory.
///
/// Each call takes the lock once, so a single `update_many` or `delete_many`
/// is atomic. Sequences of calls are not.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadataStore {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl MemoryMetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    fn backend_type(&self) -> &str {
        "memory"
    }

    async fn create(&self, document: Document) -> AppResult<Document> {
        self.documents.write().await.push(document.clone());
        Ok(document)
    }

    async fn find_one(&self, filter: &Document) -> AppResult<Option<Document>> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| matches(d, filter)).cloned())
    }

    async fn find_many(&self, filter: &Document) -> AppResult<Vec<Document>> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|d| matches(d, filter))
            .cloned()
            .collect())
    }

    async fn delete_many(&self, filter: &Document) -> AppResult<u64> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| !matches(d, filter));
        let removed = (before - documents.len()) as u64;
        debug!(removed, "Deleted documents");
        Ok(removed)
    }

    async fn update_many(&self, filter: &Document, patch: &Document) -> AppResult<u64> {
        let mut documents = self.documents.write().await;
        let mut updated = 0u64;
        for document in documents.iter_mut().filter(|d| matches(d, filter)) {
            merge(document, patch);
            updated += 1;
        }
        debug!(updated, "Updated documents");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    async fn seeded() -> MemoryMetadataStore {
        let store = MemoryMetadataStore::new();
        for (name, path) in [("a.txt", "/docs/"), ("b.txt", "/docs/"), ("c.txt", "/docs/sub/")] {
            store
                .create(doc(json!({"fileName": name, "folderPath": path})))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_find_is_exact_match() {
        let store = seeded().await;

        let hits = store
            .find_many(&doc(json!({"folderPath": "/docs/"})))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);

        let miss = store
            .find_one(&doc(json!({"folderPath": "/doc"})))
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_update_many_patches_matches_only() {
        let store = seeded().await;

        let updated = store
            .update_many(
                &doc(json!({"folderPath": "/docs/"})),
                &doc(json!({"folderPath": "/reports/"})),
            )
            .await
            .unwrap();
        assert_eq!(updated, 2);

        let deep = store
            .find_many(&doc(json!({"folderPath": "/docs/sub/"})))
            .await
            .unwrap();
        assert_eq!(deep.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_many() {
        let store = seeded().await;

        let removed = store
            .delete_many(&doc(json!({"fileName": "a.txt"})))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 2);
    }
}
