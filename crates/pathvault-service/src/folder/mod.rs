//! Folder creation and tree services.

pub mod service;
pub mod tree;

pub use service::{CreateFolderRequest, FolderService};
pub use tree::FolderTreeBuilder;
