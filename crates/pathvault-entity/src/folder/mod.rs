//! Folder tree models.

pub mod tree;

pub use tree::{FolderNode, FolderTree, ROOT_PATH};
