//! Folder creation, lookup, and tree views.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use pathvault_core::error::AppError;
use pathvault_core::result::AppResult;
use pathvault_entity::file::FileRecord;
use pathvault_entity::folder::FolderTree;

use crate::context::RequestContext;
use crate::coordinator::{FolderLookup, MutationCoordinator};
use crate::folder::tree::FolderTreeBuilder;
use crate::path::{child_path, normalize_folder_path, sanitize_name};

/// Manages folders.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Mutation coordinator.
    coordinator: Arc<MutationCoordinator>,
    /// Tree builder.
    tree: FolderTreeBuilder,
}

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name. Any `/` is stripped.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Containing folder path.
    #[validate(length(min = 1))]
    pub folder_path: String,
    /// Skip the duplicate check and let the name be resolved instead.
    #[serde(default)]
    pub ignore_duplicate: bool,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(coordinator: Arc<MutationCoordinator>) -> Self {
        let tree = FolderTreeBuilder::new(coordinator.repository().clone());
        Self { coordinator, tree }
    }

    /// Creates a new folder inside an existing one.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<FileRecord> {
        req.validate()?;
        let namespace = ctx.namespace();
        let folder_path = normalize_folder_path(&req.folder_path);
        let name = sanitize_name(&req.name);
        if name.trim().is_empty() {
            return Err(AppError::invalid_path(
                "Folder name and folder path can not be empty",
            ));
        }

        if self
            .coordinator
            .find_folder(&folder_path, namespace)
            .await?
            .is_none()
        {
            return Err(AppError::invalid_path(format!(
                "Folder {folder_path} does not exist"
            )));
        }

        if !req.ignore_duplicate
            && self
                .coordinator
                .resolver()
                .is_taken(&name, &folder_path, namespace)
                .await?
        {
            return Err(AppError::duplicate_name(format!(
                "Folder {} already exists",
                child_path(&folder_path, &name)
            )));
        }

        let folder = self
            .coordinator
            .create_folder(&name, &folder_path, namespace)
            .await?
            .ok_or_else(|| {
                AppError::duplicate_name(format!(
                    "Folder {name} already exists in path {folder_path}"
                ))
            })?;

        info!(id = %folder.id, path = %folder.full_path(), "Folder created");
        Ok(folder)
    }

    /// Looks up the folder at a full path.
    pub async fn find_folder(
        &self,
        ctx: &RequestContext,
        full_path: &str,
    ) -> AppResult<Option<FolderLookup>> {
        self.coordinator.find_folder(full_path, ctx.namespace()).await
    }

    /// Builds the complete folder tree of the request's namespace.
    pub async fn folder_tree(&self, ctx: &RequestContext) -> AppResult<FolderTree> {
        self.tree.build(ctx.namespace()).await
    }
}
