//! # pathvault-entity
//!
//! Domain models for PathVault. [`file::FileRecord`] is the single record
//! type stored for both files and folders; folders are told apart by
//! `isFolder` and located purely by their materialized `folderPath`.
//! All models derive `Debug`, `Clone`, `Serialize`, and `Deserialize` with
//! camelCase field names, which are the logical names the field mapper
//! translates at the store boundary.

pub mod file;
pub mod folder;
