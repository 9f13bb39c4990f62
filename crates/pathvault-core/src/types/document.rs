//! Schemaless documents exchanged with a [`MetadataStore`](crate::traits::MetadataStore).

use serde_json::{Map, Value};

/// A flat key/value record as seen by the store.
pub type Document = Map<String, Value>;

/// Whether `document` holds every key of `filter` with an equal value.
///
/// An empty filter matches everything.
pub fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

/// Overwrite the keys of `document` with the keys of `patch`.
pub fn merge(document: &mut Document, patch: &Document) {
    for (key, value) in patch {
        document.insert(key.clone(), value.clone());
    }
}
