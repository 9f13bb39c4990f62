//! # pathvault-storage
//!
//! Blob storage providers for PathVault. File records only carry an opaque
//! `fileSource` reference; the bytes live in a [`BlobStorage`] backend.
//!
//! [`BlobStorage`]: pathvault_core::traits::BlobStorage

pub mod mime;
pub mod providers;

pub use mime::mime_from_name;
pub use providers::{LocalBlobStorage, open_blob_storage};
