//! Structural mutations over the flat record store.
//!
//! Parentage is never stored; a folder's children are the records whose
//! `folderPath` equals the folder's own path plus `/`. Every rename, move,
//! and delete of a folder therefore has to rewrite or remove those records
//! itself. With [`CascadeMode::Subtree`] the descendant folder paths are
//! discovered level by level with exact-match queries, so the store never
//! needs prefix matching.
//!
//! Checks and writes are separate store calls. Concurrent writers targeting
//! the same slot can both pass the duplicate check.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info};

use pathvault_core::config::{CascadeMode, ConflictPolicy};
use pathvault_core::error::{AppError, codes};
use pathvault_core::result::AppResult;
use pathvault_core::types::RecordId;
use pathvault_database::RecordRepository;
use pathvault_entity::file::{FileRecord, NewRecord, RecordFilter, RecordPatch};

use crate::naming::UniqueNameResolver;
use crate::path::{child_path, decode_path, normalize_folder_path, sanitize_name};

/// Result of [`MutationCoordinator::create`].
#[derive(Debug, Clone)]
pub struct CreatedRecord {
    /// The stored record.
    pub record: FileRecord,
    /// Record removed by [`ConflictPolicy::Overwrite`], whose blob is now orphaned.
    pub replaced: Option<FileRecord>,
}

/// A folder found by [`MutationCoordinator::find_folder`].
#[derive(Debug, Clone, PartialEq)]
pub enum FolderLookup {
    /// The implicit root, which has no record.
    Root,
    /// A stored folder record.
    Folder(FileRecord),
}

impl FolderLookup {
    /// The `folderPath` carried by this folder's children.
    pub fn path(&self) -> String {
        match self {
            Self::Root => "/".to_string(),
            Self::Folder(record) => record.child_folder_path(),
        }
    }

    /// The folder record, unless this is the root.
    pub fn record(&self) -> Option<&FileRecord> {
        match self {
            Self::Root => None,
            Self::Folder(record) => Some(record),
        }
    }
}

/// Applies create, rename, move, delete, and clone while keeping names unique
/// per folder and folder paths consistent.
#[derive(Debug, Clone)]
pub struct MutationCoordinator {
    repo: RecordRepository,
    resolver: UniqueNameResolver,
    cascade: CascadeMode,
}

impl MutationCoordinator {
    /// Creates a new coordinator.
    pub fn new(repo: RecordRepository, cascade: CascadeMode) -> Self {
        Self {
            resolver: UniqueNameResolver::new(repo.clone()),
            repo,
            cascade,
        }
    }

    /// The record repository.
    pub fn repository(&self) -> &RecordRepository {
        &self.repo
    }

    /// The name resolver.
    pub fn resolver(&self) -> &UniqueNameResolver {
        &self.resolver
    }

    /// The configured cascade depth.
    pub fn cascade_mode(&self) -> CascadeMode {
        self.cascade
    }

    /// Load a record by id, failing with `NotFound`.
    pub async fn load(&self, id: RecordId, namespace: Option<&str>) -> AppResult<FileRecord> {
        self.repo
            .find_by_id(id, namespace)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No file with ID {id} found")))
    }

    /// Store a new file record, resolving a name conflict per `policy`.
    pub async fn create(
        &self,
        mut new: NewRecord,
        namespace: Option<&str>,
        policy: ConflictPolicy,
    ) -> AppResult<CreatedRecord> {
        new.folder_path = normalize_folder_path(&new.folder_path);
        new.file_name = sanitize_name(&new.file_name);
        new.namespace = namespace.map(str::to_string);
        if new.file_name.trim().is_empty() {
            return Err(AppError::invalid_path("File name can not be empty"));
        }

        let mut replaced = None;
        match policy {
            ConflictPolicy::Rename => {
                new.file_name = self
                    .resolver
                    .resolve(&new.file_name, &new.folder_path, namespace)
                    .await?;
            }
            ConflictPolicy::Overwrite => {
                let filter = RecordFilter::at(&new.file_name, &new.folder_path, namespace);
                if let Some(existing) = self.repo.find_one(&filter).await? {
                    if existing.is_folder {
                        return Err(AppError::duplicate_name(format!(
                            "Folder {} exists and can not be overwritten by a file",
                            existing.full_path()
                        )));
                    }
                    self.repo
                        .delete_many(&RecordFilter::new().id(existing.id).namespace(namespace))
                        .await?;
                    debug!(id = %existing.id, path = %existing.full_path(), "Overwriting record");
                    replaced = Some(existing);
                }
            }
            ConflictPolicy::Reject => {
                if self
                    .resolver
                    .is_taken(&new.file_name, &new.folder_path, namespace)
                    .await?
                {
                    return Err(AppError::duplicate_name(format!(
                        "File {}{} already exists",
                        new.folder_path, new.file_name
                    )));
                }
            }
        }

        let record = self.repo.create(new).await?;
        info!(
            id = %record.id,
            path = %record.full_path(),
            namespace = ?namespace,
            policy = ?policy,
            "Created file record"
        );
        Ok(CreatedRecord { record, replaced })
    }

    /// Create a folder. Returns `None` when a folder already occupies the
    /// resolved name.
    pub async fn create_folder(
        &self,
        name: &str,
        folder_path: &str,
        namespace: Option<&str>,
    ) -> AppResult<Option<FileRecord>> {
        let folder_path = normalize_folder_path(folder_path);
        let name = sanitize_name(name);
        if name.trim().is_empty() {
            return Err(AppError::invalid_path("Folder name can not be empty"));
        }
        let name = self.resolver.resolve(&name, &folder_path, namespace).await?;

        if self
            .find_folder_at(&name, &folder_path, namespace)
            .await?
            .is_some()
        {
            debug!(name = %name, folder_path = %folder_path, "Folder already exists");
            return Ok(None);
        }

        let record = self
            .repo
            .create(NewRecord::folder(name, folder_path).with_namespace(namespace))
            .await?;
        info!(id = %record.id, path = %record.full_path(), "Created folder");
        Ok(Some(record))
    }

    /// Look up the folder at a full path. The root always exists.
    pub async fn find_folder(
        &self,
        full_path: &str,
        namespace: Option<&str>,
    ) -> AppResult<Option<FolderLookup>> {
        let decoded = decode_path(full_path);
        self.find_folder_at(&decoded.file_name, &decoded.folder_path, namespace)
            .await
    }

    async fn find_folder_at(
        &self,
        name: &str,
        folder_path: &str,
        namespace: Option<&str>,
    ) -> AppResult<Option<FolderLookup>> {
        let name = sanitize_name(name);
        let folder_path = normalize_folder_path(folder_path);
        if name.trim().is_empty() && folder_path == "/" {
            return Ok(Some(FolderLookup::Root));
        }

        let filter = RecordFilter::at(&name, &folder_path, namespace);
        Ok(self
            .repo
            .find_one(&filter)
            .await?
            .filter(|record| record.is_folder)
            .map(FolderLookup::Folder))
    }

    /// Rename an entry inside its folder.
    ///
    /// Fails with `DuplicateName` if a sibling already has `new_name`; the
    /// record is left unchanged in that case.
    pub async fn rename(
        &self,
        id: RecordId,
        new_name: &str,
        namespace: Option<&str>,
    ) -> AppResult<FileRecord> {
        let record = self.load(id, namespace).await?;
        let namespace = record.namespace.as_deref();
        let new_name = sanitize_name(new_name);
        if new_name.trim().is_empty() {
            return Err(AppError::invalid_path("New name can not be empty"));
        }
        if new_name == record.file_name {
            return Ok(record);
        }

        if self
            .occupied_by_other(&record, &new_name, &record.folder_path, namespace)
            .await?
        {
            return Err(AppError::duplicate_name(
                "Can not rename file/folder to an existing name",
            )
            .with_code(codes::RENAME_DUPLICATED_FILE));
        }

        if record.is_folder {
            let new_prefix = child_path(&record.folder_path, &new_name);
            self.cascade_paths(&record, &new_prefix, namespace).await?;
        }

        self.repo
            .update_many(
                &RecordFilter::new().id(record.id).namespace(namespace),
                &RecordPatch::rename(new_name.clone()),
            )
            .await?;
        info!(id = %record.id, from = %record.file_name, to = %new_name, "Renamed record");
        self.load(id, namespace).await
    }

    /// Move an entry into another folder, keeping its name.
    ///
    /// Fails with `DuplicateName` if the target folder already holds an entry
    /// with the same name, and with `InvalidPath` when a folder would be
    /// moved into itself.
    pub async fn move_to(
        &self,
        id: RecordId,
        new_folder_path: &str,
        namespace: Option<&str>,
    ) -> AppResult<FileRecord> {
        let record = self.load(id, namespace).await?;
        let namespace = record.namespace.as_deref();
        let new_folder_path = normalize_folder_path(new_folder_path);
        if new_folder_path == record.folder_path {
            return Ok(record);
        }

        if record.is_folder && new_folder_path.starts_with(&record.child_folder_path()) {
            return Err(AppError::invalid_path(format!(
                "Can not move folder {} into itself",
                record.full_path()
            )));
        }

        if self
            .occupied_by_other(&record, &record.file_name, &new_folder_path, namespace)
            .await?
        {
            return Err(AppError::duplicate_name(
                "Can not move file/folder: a file/folder with the same name exists in new location",
            )
            .with_code(codes::MOVE_DUPLICATED_FILE));
        }

        if record.is_folder {
            let new_prefix = child_path(&new_folder_path, &record.file_name);
            self.cascade_paths(&record, &new_prefix, namespace).await?;
        }

        self.repo
            .update_many(
                &RecordFilter::new().id(record.id).namespace(namespace),
                &RecordPatch::relocate(new_folder_path.clone()),
            )
            .await?;
        info!(
            id = %record.id,
            from = %record.folder_path,
            to = %new_folder_path,
            "Moved record"
        );
        self.load(id, namespace).await
    }

    /// Rename and/or move in one call. The rename is applied first.
    pub async fn edit(
        &self,
        id: RecordId,
        changes: &RecordPatch,
        namespace: Option<&str>,
    ) -> AppResult<FileRecord> {
        let mut record = self.load(id, namespace).await?;
        let namespace = record.namespace.clone();
        let namespace = namespace.as_deref();
        if let Some(file_name) = &changes.file_name {
            record = self.rename(id, file_name, namespace).await?;
        }
        if let Some(folder_path) = &changes.folder_path {
            record = self.move_to(id, folder_path, namespace).await?;
        }
        Ok(record)
    }

    /// Delete an entry. A folder takes its cascaded contents with it.
    ///
    /// Returns the number of records removed. Blobs referenced by the removed
    /// records are left to the caller.
    pub async fn delete(&self, id: RecordId, namespace: Option<&str>) -> AppResult<u64> {
        let record = self.load(id, namespace).await?;
        let namespace = record.namespace.as_deref();

        let mut removed = 0;
        if record.is_folder {
            for dir in self.cascade_dirs(&record, namespace).await? {
                removed += self
                    .repo
                    .delete_many(&RecordFilter::new().folder_path(dir).namespace(namespace))
                    .await?;
            }
        }
        removed += self
            .repo
            .delete_many(&RecordFilter::new().id(record.id).namespace(namespace))
            .await?;

        info!(
            id = %record.id,
            path = %record.full_path(),
            removed,
            "Deleted record"
        );
        Ok(removed)
    }

    /// Copy a file record into `new_folder_path` under a free name, pointing
    /// at `new_file_source`.
    pub async fn clone_record(
        &self,
        id: RecordId,
        new_folder_path: &str,
        new_file_source: Option<String>,
        namespace: Option<&str>,
    ) -> AppResult<FileRecord> {
        let source = self.load(id, namespace).await?;
        let namespace = source.namespace.clone();
        if source.is_folder {
            return Err(AppError::invalid_path(format!(
                "Can not clone folder {}",
                source.full_path()
            )));
        }

        let folder_path = normalize_folder_path(new_folder_path);
        let file_name = self
            .resolver
            .resolve(&source.file_name, &folder_path, namespace.as_deref())
            .await?;

        let source_id = source.id;
        let mut copy = NewRecord::from(source);
        copy.file_name = file_name;
        copy.folder_path = folder_path;
        copy.file_source = new_file_source;
        copy.namespace = namespace;

        let record = self.repo.create(copy).await?;
        info!(from = %source_id, id = %record.id, path = %record.full_path(), "Cloned record");
        Ok(record)
    }

    /// Every record a delete of `folder` removes besides the folder itself.
    pub async fn contents(&self, folder: &FileRecord) -> AppResult<Vec<FileRecord>> {
        let namespace = folder.namespace.as_deref();
        let mut records = Vec::new();
        for dir in self.cascade_dirs(folder, namespace).await? {
            records.extend(
                self.repo
                    .find_many(&RecordFilter::new().folder_path(dir).namespace(namespace))
                    .await?,
            );
        }
        Ok(records)
    }

    async fn occupied_by_other(
        &self,
        record: &FileRecord,
        file_name: &str,
        folder_path: &str,
        namespace: Option<&str>,
    ) -> AppResult<bool> {
        let filter = RecordFilter::at(file_name, folder_path, namespace);
        Ok(self
            .repo
            .find_many(&filter)
            .await?
            .iter()
            .any(|other| other.id != record.id))
    }

    /// Folder paths a cascade on `folder` has to visit, the folder's own
    /// child path first.
    async fn cascade_dirs(
        &self,
        folder: &FileRecord,
        namespace: Option<&str>,
    ) -> AppResult<Vec<String>> {
        let root = folder.child_folder_path();
        if self.cascade == CascadeMode::Shallow {
            return Ok(vec![root]);
        }

        let mut seen = HashSet::from([root.clone()]);
        let mut queue = VecDeque::from([root]);
        let mut dirs = Vec::new();
        while let Some(dir) = queue.pop_front() {
            let filter = RecordFilter::new()
                .folder_path(dir.as_str())
                .is_folder(true)
                .namespace(namespace);
            for child in self.repo.find_many(&filter).await? {
                let path = child.child_folder_path();
                if seen.insert(path.clone()) {
                    queue.push_back(path);
                }
            }
            dirs.push(dir);
        }
        Ok(dirs)
    }

    /// Rewrite the `folderPath` of everything below `folder` so that its old
    /// child path is replaced by `new_prefix`.
    async fn cascade_paths(
        &self,
        folder: &FileRecord,
        new_prefix: &str,
        namespace: Option<&str>,
    ) -> AppResult<u64> {
        let old_prefix = folder.child_folder_path();
        let mut updated = 0;
        for dir in self.cascade_dirs(folder, namespace).await? {
            let Some(rest) = dir.strip_prefix(old_prefix.as_str()) else {
                continue;
            };
            let target = format!("{new_prefix}{rest}");
            updated += self
                .repo
                .update_many(
                    &RecordFilter::new().folder_path(dir.as_str()).namespace(namespace),
                    &RecordPatch::relocate(target),
                )
                .await?;
        }
        debug!(
            from = %old_prefix,
            to = new_prefix,
            updated,
            mode = ?self.cascade,
            "Cascaded folder path change"
        );
        Ok(updated)
    }
}
