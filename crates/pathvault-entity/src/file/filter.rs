//! Equality filters and patches over record fields.

use serde::{Deserialize, Serialize};

use pathvault_core::types::RecordId;

/// A conjunctive exact-match filter. Unset fields are not constrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    /// Match on identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Match on name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Match on containing folder path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
    /// Match on folder flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_folder: Option<bool>,
    /// Match on tenant namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl RecordFilter {
    /// An unconstrained filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain by identifier.
    pub fn id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    /// Constrain by name.
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Constrain by containing folder path.
    pub fn folder_path(mut self, folder_path: impl Into<String>) -> Self {
        self.folder_path = Some(folder_path.into());
        self
    }

    /// Constrain by folder flag.
    pub fn is_folder(mut self, is_folder: bool) -> Self {
        self.is_folder = Some(is_folder);
        self
    }

    /// Scope to a namespace. `None` leaves the filter unscoped.
    pub fn namespace(mut self, namespace: Option<&str>) -> Self {
        self.namespace = namespace.map(str::to_string);
        self
    }

    /// Exact location of an entry inside a namespace.
    pub fn at(file_name: &str, folder_path: &str, namespace: Option<&str>) -> Self {
        Self::new()
            .file_name(file_name)
            .folder_path(folder_path)
            .namespace(namespace)
    }
}

/// Fields rewritten by an update. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// New containing folder path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
}

impl RecordPatch {
    /// Rename only.
    pub fn rename(file_name: impl Into<String>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            folder_path: None,
        }
    }

    /// Relocate only.
    pub fn relocate(folder_path: impl Into<String>) -> Self {
        Self {
            file_name: None,
            folder_path: Some(folder_path.into()),
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.file_name.is_none() && self.folder_path.is_none()
    }
}
