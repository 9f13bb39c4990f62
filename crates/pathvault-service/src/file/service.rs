//! File operations: upload, metadata registration, rename, move, clone,
//! delete, and lookups.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use pathvault_core::config::ConflictPolicy;
use pathvault_core::error::{AppError, ErrorKind};
use pathvault_core::result::AppResult;
use pathvault_core::traits::{BlobStorage, ByteStream, UploadTicket};
use pathvault_core::types::RecordId;
use pathvault_entity::file::{FileRecord, NewRecord, RecordFilter, RecordPatch};
use pathvault_storage::mime_from_name;

use crate::context::RequestContext;
use crate::coordinator::MutationCoordinator;
use crate::path::{absolute, decode_path, normalize_folder_path, sanitize_name};

/// Manages file records and their blobs.
#[derive(Clone)]
pub struct FileService {
    /// Mutation coordinator.
    coordinator: Arc<MutationCoordinator>,
    /// Blob storage collaborator.
    blobs: Arc<dyn BlobStorage>,
    /// Policy applied when an upload does not name one.
    default_policy: ConflictPolicy,
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService")
            .field("blobs", &self.blobs.provider_type())
            .field("default_policy", &self.default_policy)
            .finish()
    }
}

/// Parameters for a streamed upload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Target folder path.
    #[validate(length(min = 1))]
    pub folder_path: String,
    /// Original file name.
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    /// MIME type. Guessed from the name when absent.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Conflict policy. The service default applies when absent.
    #[serde(default)]
    pub policy: Option<ConflictPolicy>,
}

/// Metadata for a blob the client uploaded directly to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    /// Target folder path.
    #[validate(length(min = 1))]
    pub folder_path: String,
    /// File name.
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    /// Blob reference returned by the upload.
    #[serde(default)]
    pub file_source: Option<String>,
    /// Payload size.
    #[serde(default)]
    pub size_in_bytes: u64,
    /// MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Accept a taken name and resolve a free one instead of failing.
    #[serde(default)]
    pub ignore_duplicate: bool,
}

/// Target for a client-direct upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrl {
    /// Blob name the client must upload under.
    pub generated_file_name: String,
    /// Collision-free display name in the target folder.
    pub original_file_name: String,
    /// Backend upload ticket.
    #[serde(flatten)]
    pub ticket: UploadTicket,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        coordinator: Arc<MutationCoordinator>,
        blobs: Arc<dyn BlobStorage>,
        default_policy: ConflictPolicy,
    ) -> Self {
        Self {
            coordinator,
            blobs,
            default_policy,
        }
    }

    /// Check that `folder_path` names an existing folder. Returns it normalized.
    pub async fn validate_folder_path(
        &self,
        ctx: &RequestContext,
        folder_path: &str,
    ) -> AppResult<String> {
        if folder_path.trim().is_empty() {
            return Err(AppError::invalid_path("Missing folder path in request"));
        }
        let folder_path = normalize_folder_path(folder_path.trim());
        match self
            .coordinator
            .find_folder(&folder_path, ctx.namespace())
            .await?
        {
            Some(_) => Ok(folder_path),
            None => Err(AppError::invalid_path(format!(
                "Folder {folder_path} does not exist"
            ))),
        }
    }

    /// Context scoped to the namespace of the record `id`.
    async fn record_scope(&self, ctx: &RequestContext, id: RecordId) -> AppResult<RequestContext> {
        let record = self.get_by_id(ctx, id).await?;
        Ok(RequestContext::new(record.namespace))
    }

    /// Store a byte stream and create its record.
    ///
    /// The blob is removed again if the record can not be written. With
    /// [`ConflictPolicy::Overwrite`] the replaced record's blob is removed.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        req: UploadRequest,
        stream: ByteStream,
    ) -> AppResult<FileRecord> {
        req.validate()?;
        let folder_path = self.validate_folder_path(ctx, &req.folder_path).await?;
        let file_name = non_empty_name(&req.file_name)?;
        let policy = req.policy.unwrap_or(self.default_policy);

        let blob = self.blobs.upload(&file_name, stream).await?;
        let mime_type = req.mime_type.or_else(|| mime_from_name(&file_name));
        let new = NewRecord::file(file_name, folder_path).with_source(
            blob.blob_ref.clone(),
            blob.size_in_bytes,
            mime_type,
        );

        let created = match self.coordinator.create(new, ctx.namespace(), policy).await {
            Ok(created) => created,
            Err(e) => {
                self.discard_blob(&blob.blob_ref).await;
                return Err(e);
            }
        };

        if let Some(source) = created.replaced.and_then(|r| r.file_source) {
            self.discard_blob(&source).await;
        }

        info!(
            id = %created.record.id,
            path = %created.record.full_path(),
            bytes = blob.size_in_bytes,
            "File uploaded"
        );
        Ok(created.record)
    }

    /// Create the record for a blob uploaded directly by the client.
    pub async fn register_upload(
        &self,
        ctx: &RequestContext,
        req: CreateFileRequest,
    ) -> AppResult<FileRecord> {
        req.validate()?;
        let folder_path = self.validate_folder_path(ctx, &req.folder_path).await?;
        let file_name = non_empty_name(&req.file_name)?;

        let policy = if req.ignore_duplicate {
            ConflictPolicy::Rename
        } else {
            ConflictPolicy::Reject
        };

        let mut new = NewRecord::file(file_name, folder_path);
        new.file_source = req.file_source;
        new.size_in_bytes = req.size_in_bytes;
        new.mime_type = req.mime_type.or_else(|| mime_from_name(&new.file_name));

        let created = self.coordinator.create(new, ctx.namespace(), policy).await?;
        Ok(created.record)
    }

    /// Issue a client-direct upload target for `file_name` in `folder_path`.
    pub async fn upload_url(
        &self,
        ctx: &RequestContext,
        folder_path: &str,
        file_name: &str,
    ) -> AppResult<UploadUrl> {
        let folder_path = self.validate_folder_path(ctx, folder_path).await?;
        let file_name = non_empty_name(file_name)?;

        let generated_file_name = match Path::new(&file_name).extension() {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_string_lossy()),
            None => Uuid::new_v4().to_string(),
        };
        let ticket = self.blobs.upload_url(&generated_file_name).await?;
        let original_file_name = self
            .coordinator
            .resolver()
            .resolve(&file_name, &folder_path, ctx.namespace())
            .await?;

        Ok(UploadUrl {
            generated_file_name,
            original_file_name,
            ticket,
        })
    }

    /// Rename a file or folder.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        id: RecordId,
        new_name: &str,
    ) -> AppResult<FileRecord> {
        self.coordinator.rename(id, new_name, ctx.namespace()).await
    }

    /// Move a file or folder into an existing folder.
    pub async fn move_to(
        &self,
        ctx: &RequestContext,
        id: RecordId,
        new_folder_path: &str,
    ) -> AppResult<FileRecord> {
        let scope = self.record_scope(ctx, id).await?;
        let new_folder_path = self.validate_folder_path(&scope, new_folder_path).await?;
        self.coordinator
            .move_to(id, &new_folder_path, scope.namespace())
            .await
    }

    /// Rename and/or move.
    pub async fn edit(
        &self,
        ctx: &RequestContext,
        id: RecordId,
        mut changes: RecordPatch,
    ) -> AppResult<FileRecord> {
        let scope = self.record_scope(ctx, id).await?;
        if let Some(folder_path) = &changes.folder_path {
            changes.folder_path = Some(self.validate_folder_path(&scope, folder_path).await?);
        }
        self.coordinator.edit(id, &changes, scope.namespace()).await
    }

    /// Copy a file, blob included, into `new_folder_path`.
    pub async fn clone_file(
        &self,
        ctx: &RequestContext,
        id: RecordId,
        new_folder_path: &str,
    ) -> AppResult<FileRecord> {
        let source = self.get_by_id(ctx, id).await?;
        let scope = RequestContext::new(source.namespace.clone());
        let new_folder_path = self.validate_folder_path(&scope, new_folder_path).await?;
        if source.is_folder {
            return Err(AppError::invalid_path(format!(
                "Can not clone folder {}",
                source.full_path()
            )));
        }

        let new_source = match &source.file_source {
            Some(blob_ref) => Some(self.blobs.clone_blob(blob_ref).await?),
            None => None,
        };

        match self
            .coordinator
            .clone_record(id, &new_folder_path, new_source.clone(), scope.namespace())
            .await
        {
            Ok(record) => Ok(record),
            Err(e) => {
                if let Some(blob_ref) = &new_source {
                    self.discard_blob(blob_ref).await;
                }
                Err(e)
            }
        }
    }

    /// Delete a file, or a folder with everything the cascade reaches.
    ///
    /// Blobs go first. If one can not be deleted, no metadata is removed.
    pub async fn delete(&self, ctx: &RequestContext, id: RecordId) -> AppResult<u64> {
        let record = self.get_by_id(ctx, id).await?;

        let doomed = if record.is_folder {
            self.coordinator.contents(&record).await?
        } else {
            vec![record.clone()]
        };
        for blob_ref in doomed.iter().filter_map(|r| r.file_source.as_deref()) {
            self.blobs.delete(blob_ref).await?;
        }

        self.coordinator
            .delete(record.id, record.namespace.as_deref())
            .await
    }

    /// Delete by full path.
    pub async fn delete_by_path(&self, ctx: &RequestContext, full_path: &str) -> AppResult<u64> {
        let record = self.get_by_full_path(ctx, full_path).await?;
        self.delete(ctx, record.id).await
    }

    /// Every entry directly inside a folder, folders first, then by name.
    pub async fn list_by_folder(
        &self,
        ctx: &RequestContext,
        folder_path: &str,
    ) -> AppResult<Vec<FileRecord>> {
        let folder_path = self.validate_folder_path(ctx, folder_path).await?;
        let mut records = self
            .coordinator
            .repository()
            .find_many(
                &RecordFilter::new()
                    .folder_path(folder_path)
                    .namespace(ctx.namespace()),
            )
            .await?;
        records.sort_by(|a, b| {
            b.is_folder
                .cmp(&a.is_folder)
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        Ok(records)
    }

    /// Get a record by id.
    pub async fn get_by_id(&self, ctx: &RequestContext, id: RecordId) -> AppResult<FileRecord> {
        self.coordinator.load(id, ctx.namespace()).await
    }

    /// Get a record by full path (`/docs/a.txt`, or `/docs/sub/` for a folder).
    pub async fn get_by_full_path(
        &self,
        ctx: &RequestContext,
        full_path: &str,
    ) -> AppResult<FileRecord> {
        self.find_by_full_path(ctx, full_path)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No file with path {full_path} found")))
    }

    /// Whether an entry exists at a full path.
    pub async fn exists(&self, ctx: &RequestContext, full_path: &str) -> AppResult<bool> {
        match self.get_by_full_path(ctx, full_path).await {
            Ok(_) => Ok(true),
            Err(e) if e.is(ErrorKind::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// The configured logical to storage field name table.
    pub fn field_mappings(&self) -> BTreeMap<String, String> {
        self.coordinator.repository().mapper().mappings()
    }

    async fn find_by_full_path(
        &self,
        ctx: &RequestContext,
        full_path: &str,
    ) -> AppResult<Option<FileRecord>> {
        let decoded = decode_path(&absolute(full_path));
        if decoded.file_name.is_empty() {
            return Ok(None);
        }
        self.coordinator
            .repository()
            .find_one(&RecordFilter::at(
                &decoded.file_name,
                &decoded.folder_path,
                ctx.namespace(),
            ))
            .await
    }

    async fn discard_blob(&self, blob_ref: &str) {
        if let Err(e) = self.blobs.delete(blob_ref).await {
            warn!(blob_ref, error = %e, "Failed to delete orphaned blob");
        }
    }
}

fn non_empty_name(name: &str) -> AppResult<String> {
    let name = sanitize_name(name);
    if name.trim().is_empty() {
        return Err(AppError::invalid_path("File name can not be empty"));
    }
    Ok(name)
}
