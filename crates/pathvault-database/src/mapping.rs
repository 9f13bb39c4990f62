//! Bidirectional renaming between logical and storage field names.
//!
//! Records are modelled with fixed logical names (`fileName`, `folderPath`,
//! ...). A backend may store them under other names (`_id`, `file_name`).
//! The [`FieldMapper`] is built once from configuration and applied to every
//! document crossing the store boundary.

use std::collections::{BTreeMap, HashMap};

use pathvault_core::error::AppError;
use pathvault_core::result::AppResult;
use pathvault_core::types::Document;
use pathvault_entity::file::fields;

/// Immutable logical <-> storage field name table.
#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    to_storage: HashMap<String, String>,
    to_logical: HashMap<String, String>,
}

impl FieldMapper {
    /// A mapper that leaves every name unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build a mapper from `(logical, storage)` pairs.
    ///
    /// Logical names are matched case-insensitively against the record's
    /// fields, since configuration sources may fold key case. Fails when a
    /// logical name is unknown, a storage name is blank, or two fields would
    /// end up stored under the same name.
    pub fn new<I, K, V>(mappings: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut to_storage = HashMap::new();
        let mut to_logical = HashMap::new();

        for (logical, storage) in mappings {
            let logical = canonical_field(logical.as_ref()).ok_or_else(|| {
                AppError::configuration(format!(
                    "Unknown field '{}' in field mappings",
                    logical.as_ref()
                ))
            })?;
            let storage = storage.as_ref().trim();
            if storage.is_empty() {
                return Err(AppError::configuration(format!(
                    "Field '{logical}' is mapped to an empty name"
                )));
            }
            if storage == logical {
                continue;
            }
            if let Some(previous) = to_logical.insert(storage.to_string(), logical.to_string()) {
                return Err(AppError::configuration(format!(
                    "Fields '{previous}' and '{logical}' are both mapped to '{storage}'"
                )));
            }
            to_storage.insert(logical.to_string(), storage.to_string());
        }

        // A storage name must not shadow another field that keeps its own name.
        for (storage, logical) in &to_logical {
            if fields::ALL.contains(&storage.as_str()) && !to_storage.contains_key(storage) {
                return Err(AppError::configuration(format!(
                    "Field '{logical}' is mapped to '{storage}', which is an unmapped field name"
                )));
            }
        }

        Ok(Self {
            to_storage,
            to_logical,
        })
    }

    /// The configured table, logical name to storage name.
    pub fn mappings(&self) -> BTreeMap<String, String> {
        self.to_storage
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Storage name for a logical field.
    pub fn storage_name<'a>(&'a self, logical: &'a str) -> &'a str {
        self.to_storage.get(logical).map_or(logical, String::as_str)
    }

    /// Logical name for a storage field.
    pub fn logical_name<'a>(&'a self, storage: &'a str) -> &'a str {
        self.to_logical.get(storage).map_or(storage, String::as_str)
    }

    /// Rename logical keys to storage keys. Unmapped keys pass through.
    pub fn to_storage(&self, document: Document) -> Document {
        rename_keys(document, &self.to_storage)
    }

    /// Rename storage keys back to logical keys. Unmapped keys pass through.
    pub fn to_logical(&self, document: Document) -> Document {
        rename_keys(document, &self.to_logical)
    }
}

fn canonical_field(name: &str) -> Option<&'static str> {
    fields::ALL
        .iter()
        .copied()
        .find(|field| field.eq_ignore_ascii_case(name))
}

fn rename_keys(document: Document, table: &HashMap<String, String>) -> Document {
    if table.is_empty() {
        return document;
    }
    document
        .into_iter()
        .map(|(key, value)| match table.get(&key) {
            Some(renamed) => (renamed.clone(), value),
            None => (key, value),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathvault_core::error::ErrorKind;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_round_trip_renames_mapped_keys_only() {
        let mapper = FieldMapper::new([("id", "_id"), ("fileName", "name")]).unwrap();
        let logical = doc(json!({"id": "x", "fileName": "a.txt", "folderPath": "/"}));

        let stored = mapper.to_storage(logical.clone());
        assert_eq!(stored, doc(json!({"_id": "x", "name": "a.txt", "folderPath": "/"})));
        assert_eq!(mapper.to_logical(stored), logical);
    }

    #[test]
    fn test_logical_names_are_case_insensitive() {
        let mapper = FieldMapper::new([("foldername", "x")]);
        assert!(mapper.is_err());

        let mapper = FieldMapper::new([("folderpath", "parent")]).unwrap();
        assert_eq!(mapper.storage_name("folderPath"), "parent");
        assert_eq!(mapper.logical_name("parent"), "folderPath");
        assert_eq!(mapper.storage_name("fileName"), "fileName");
    }

    #[test]
    fn test_two_fields_on_one_storage_name_is_rejected() {
        let err = FieldMapper::new([("fileName", "name"), ("mimeType", "name")]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_shadowing_an_unmapped_field_is_rejected() {
        let err = FieldMapper::new([("fileName", "folderPath")]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);

        // Swapping two names is fine: neither keeps its own.
        let mapper = FieldMapper::new([("fileName", "folderPath"), ("folderPath", "fileName")])
            .unwrap();
        assert_eq!(mapper.storage_name("fileName"), "folderPath");
    }

    #[test]
    fn test_identity_mappings_are_dropped() {
        let mapper = FieldMapper::new([("namespace", "namespace")]).unwrap();
        assert!(mapper.mappings().is_empty());
    }
}
