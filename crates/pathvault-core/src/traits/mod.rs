//! Collaborator traits defined in `pathvault-core` and implemented by other crates.

pub mod metadata;
pub mod storage;

pub use metadata::MetadataStore;
pub use storage::{BlobStorage, ByteStream, UploadTicket, UploadedBlob};
