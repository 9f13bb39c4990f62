//! # pathvault-service
//!
//! Hierarchy rules and the application services built on them.
//!
//! [`MutationCoordinator`] owns every structural change (create, rename,
//! move, delete, clone) and keeps entry names unique per folder while
//! cascading path changes to descendants. [`FileService`], [`FolderService`],
//! and [`DownloadService`] wrap it for callers, adding folder validation and
//! blob handling.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references. [`Services`] wires the full set
//! from configuration.

pub mod context;
pub mod coordinator;
pub mod file;
pub mod folder;
pub mod naming;
pub mod path;
pub mod services;

pub use context::RequestContext;
pub use coordinator::{CreatedRecord, FolderLookup, MutationCoordinator};
pub use file::{Disposition, Download, DownloadService, FileService};
pub use folder::{FolderService, FolderTreeBuilder};
pub use naming::UniqueNameResolver;
pub use services::Services;
