//! Blob storage trait for pluggable byte payload backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading and writing blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Result of storing a blob.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UploadedBlob {
    /// Opaque reference to pass back into the backend.
    pub blob_ref: String,
    /// Number of bytes written.
    pub size_in_bytes: u64,
}

/// Presigned upload target for client-direct backends.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UploadTicket {
    /// URL the client uploads to.
    pub url: String,
    /// Extra form fields or headers the client must send.
    pub fields: std::collections::BTreeMap<String, String>,
}

/// Trait for blob storage backends.
///
/// The hierarchy layer never interprets a blob reference; it only stores it
/// in `fileSource` and hands it back here.
#[async_trait]
pub trait BlobStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Store a byte stream. `original_name` is only used to keep the extension.
    async fn upload(&self, original_name: &str, stream: ByteStream) -> AppResult<UploadedBlob>;

    /// Read a blob as a byte stream.
    async fn download(&self, blob_ref: &str) -> AppResult<ByteStream>;

    /// Delete a blob. Deleting a missing blob is not an error.
    async fn delete(&self, blob_ref: &str) -> AppResult<()>;

    /// Issue a presigned upload target for a client-direct upload.
    async fn upload_url(&self, blob_name: &str) -> AppResult<UploadTicket>;

    /// Hex-encoded SHA-256 of the blob contents.
    async fn checksum(&self, blob_ref: &str) -> AppResult<String>;

    /// Duplicate a blob and return the new reference.
    async fn clone_blob(&self, blob_ref: &str) -> AppResult<String>;
}
