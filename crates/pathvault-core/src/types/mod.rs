//! Core type definitions used across the PathVault workspace.

pub mod document;
pub mod id;

pub use document::Document;
pub use id::RecordId;
