//! Folder tree structures for hierarchical display.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::file::FileRecord;

/// Path of the implicit root folder.
pub const ROOT_PATH: &str = "/";

/// A node in a folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    /// Folder name (`/` for the root).
    pub name: String,
    /// Full path of the folder, ending with `/`.
    pub path: String,
    /// Child folders sorted by name.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// The implicit root node with no children.
    pub fn root() -> Self {
        Self {
            name: ROOT_PATH.to_string(),
            path: ROOT_PATH.to_string(),
            children: Vec::new(),
        }
    }

    /// Number of folders below this node.
    pub fn descendant_count(&self) -> u64 {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Find a node by full path.
    pub fn find(&self, path: &str) -> Option<&FolderNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(path))
    }
}

/// A complete folder tree rooted at `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderTree {
    /// The root node.
    pub root: FolderNode,
    /// Total number of folders in the tree, root excluded.
    pub total_folders: u64,
}

impl FolderTree {
    /// Create an empty folder tree.
    pub fn empty() -> Self {
        Self::from_root(FolderNode::root())
    }

    /// Wrap a built root node.
    pub fn from_root(root: FolderNode) -> Self {
        let total_folders = root.descendant_count();
        Self {
            root,
            total_folders,
        }
    }

    /// Assemble a tree from folder records already in hand.
    ///
    /// Records are grouped by parent path first, so the result does not depend
    /// on their order. Non-folder records and folders whose parent chain does
    /// not reach `/` are ignored.
    pub fn from_records(records: &[FileRecord]) -> Self {
        let mut by_parent: HashMap<&str, Vec<&FileRecord>> = HashMap::new();
        for record in records.iter().filter(|r| r.is_folder) {
            by_parent
                .entry(record.folder_path.as_str())
                .or_default()
                .push(record);
        }

        let mut root = FolderNode::root();
        root.children = attach(ROOT_PATH, &by_parent, 0);
        Self::from_root(root)
    }
}

/// Guards against a corrupted store whose paths loop back on themselves.
const MAX_DEPTH: usize = 512;

fn attach(
    path: &str,
    by_parent: &HashMap<&str, Vec<&FileRecord>>,
    depth: usize,
) -> Vec<FolderNode> {
    if depth >= MAX_DEPTH {
        return Vec::new();
    }
    let mut children: Vec<FolderNode> = by_parent
        .get(path)
        .map(|records| {
            records
                .iter()
                .map(|record| {
                    let child_path = record.child_folder_path();
                    let grandchildren = attach(&child_path, by_parent, depth + 1);
                    FolderNode {
                        name: record.file_name.clone(),
                        path: child_path,
                        children: grandchildren,
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    children.sort_by(|a, b| a.name.cmp(&b.name));
    children
}
