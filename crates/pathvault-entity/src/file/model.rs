//! File record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pathvault_core::types::RecordId;

/// Logical field names as they appear in serialized records.
pub mod fields {
    /// Record identifier.
    pub const ID: &str = "id";
    /// Entry name, never containing `/`.
    pub const FILE_NAME: &str = "fileName";
    /// Materialized parent path, always `/`-delimited on both ends.
    pub const FOLDER_PATH: &str = "folderPath";
    /// Folder flag.
    pub const IS_FOLDER: &str = "isFolder";
    /// MIME type.
    pub const MIME_TYPE: &str = "mimeType";
    /// Payload size.
    pub const SIZE_IN_BYTES: &str = "sizeInBytes";
    /// Blob reference.
    pub const FILE_SOURCE: &str = "fileSource";
    /// Tenant scope.
    pub const NAMESPACE: &str = "namespace";
    /// Creation timestamp.
    pub const CREATED_AT: &str = "createdAt";
    /// Last update timestamp.
    pub const UPDATED_AT: &str = "updatedAt";

    /// Every logical field name.
    pub const ALL: [&str; 10] = [
        ID,
        FILE_NAME,
        FOLDER_PATH,
        IS_FOLDER,
        MIME_TYPE,
        SIZE_IN_BYTES,
        FILE_SOURCE,
        NAMESPACE,
        CREATED_AT,
        UPDATED_AT,
    ];
}

/// A file or folder entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Unique record identifier.
    pub id: RecordId,
    /// Entry name (including extension for files).
    pub file_name: String,
    /// Path of the containing folder, e.g. `/docs/`. Root is `/`.
    pub folder_path: String,
    /// Whether this entry is a folder.
    #[serde(default)]
    pub is_folder: bool,
    /// MIME type of the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Payload size in bytes (0 for folders).
    #[serde(default)]
    pub size_in_bytes: u64,
    /// Reference into the blob backend. Absent for folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_source: Option<String>,
    /// Tenant scope, immutable once set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Full path of the entry: `/docs/a.txt`, or `/docs/sub/` for a folder.
    pub fn full_path(&self) -> String {
        if self.is_folder {
            self.child_folder_path()
        } else {
            format!("{}{}", self.folder_path, self.file_name)
        }
    }

    /// The `folderPath` value carried by this folder's direct children.
    pub fn child_folder_path(&self) -> String {
        format!("{}{}/", self.folder_path, self.file_name)
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.file_name)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to create a new record. Identifier and timestamps are
/// assigned at the store boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    /// Entry name.
    pub file_name: String,
    /// Containing folder path.
    pub folder_path: String,
    /// Folder flag.
    pub is_folder: bool,
    /// MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Payload size in bytes.
    pub size_in_bytes: u64,
    /// Blob reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_source: Option<String>,
    /// Tenant scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl NewRecord {
    /// A file entry with no payload details yet.
    pub fn file(file_name: impl Into<String>, folder_path: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            folder_path: folder_path.into(),
            is_folder: false,
            mime_type: None,
            size_in_bytes: 0,
            file_source: None,
            namespace: None,
        }
    }

    /// A folder entry.
    pub fn folder(file_name: impl Into<String>, folder_path: impl Into<String>) -> Self {
        Self {
            is_folder: true,
            ..Self::file(file_name, folder_path)
        }
    }

    /// Attach blob details.
    pub fn with_source(
        mut self,
        file_source: impl Into<String>,
        size_in_bytes: u64,
        mime_type: Option<String>,
    ) -> Self {
        self.file_source = Some(file_source.into());
        self.size_in_bytes = size_in_bytes;
        self.mime_type = mime_type;
        self
    }

    /// Scope to a tenant namespace.
    pub fn with_namespace(mut self, namespace: Option<&str>) -> Self {
        self.namespace = namespace.map(str::to_string);
        self
    }
}

impl From<FileRecord> for NewRecord {
    fn from(record: FileRecord) -> Self {
        Self {
            file_name: record.file_name,
            folder_path: record.folder_path,
            is_folder: record.is_folder,
            mime_type: record.mime_type,
            size_in_bytes: record.size_in_bytes,
            file_source: record.file_source,
            namespace: record.namespace,
        }
    }
}
