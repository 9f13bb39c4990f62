//! # pathvault-core
//!
//! Core crate for PathVault. Contains the collaborator traits (metadata
//! store and blob storage), configuration schemas, typed identifiers,
//! the schemaless [`Document`](types::Document) type, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other PathVault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
