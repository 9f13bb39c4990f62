//! Folder tree reconstruction from flat folder records.

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

use pathvault_core::result::AppResult;
use pathvault_database::RecordRepository;
use pathvault_entity::file::RecordFilter;
use pathvault_entity::folder::{FolderNode, FolderTree, ROOT_PATH};

/// Hard stop for corrupted stores whose paths loop back on themselves.
const MAX_DEPTH: usize = 512;

/// Builds the folder tree of a namespace.
#[derive(Debug, Clone)]
pub struct FolderTreeBuilder {
    repo: RecordRepository,
}

impl FolderTreeBuilder {
    /// Creates a new tree builder.
    pub fn new(repo: RecordRepository) -> Self {
        Self { repo }
    }

    /// Build the tree by querying each level for its child folders.
    ///
    /// Every node is fetched by its exact path, so the result does not depend
    /// on the order in which the store returns records.
    pub async fn build(&self, namespace: Option<&str>) -> AppResult<FolderTree> {
        let mut root = FolderNode::root();
        root.children = self.children_of(ROOT_PATH.to_string(), namespace, 0).await?;
        let tree = FolderTree::from_root(root);
        debug!(total_folders = tree.total_folders, "Built folder tree");
        Ok(tree)
    }

    /// Build the tree from a single query over every folder record.
    pub async fn snapshot(&self, namespace: Option<&str>) -> AppResult<FolderTree> {
        let folders = self
            .repo
            .find_many(&RecordFilter::new().is_folder(true).namespace(namespace))
            .await?;
        Ok(FolderTree::from_records(&folders))
    }

    fn children_of<'a>(
        &'a self,
        path: String,
        namespace: Option<&'a str>,
        depth: usize,
    ) -> BoxFuture<'a, AppResult<Vec<FolderNode>>> {
        async move {
            if depth >= MAX_DEPTH {
                return Ok(Vec::new());
            }

            let filter = RecordFilter::new()
                .folder_path(path)
                .is_folder(true)
                .namespace(namespace);
            let mut children = Vec::new();
            for record in self.repo.find_many(&filter).await? {
                let child_path = record.child_folder_path();
                let grandchildren = self
                    .children_of(child_path.clone(), namespace, depth + 1)
                    .await?;
                children.push(FolderNode {
                    name: record.file_name,
                    path: child_path,
                    children: grandchildren,
                });
            }
            children.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(children)
        }
        .boxed()
    }
}
