//! File services: uploads, structural edits, lookups, and downloads.

pub mod download;
pub mod service;

pub use download::{Disposition, Download, DownloadService};
pub use service::{CreateFileRequest, FileService, UploadRequest, UploadUrl};
