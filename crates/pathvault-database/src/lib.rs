//! # pathvault-database
//!
//! The metadata store boundary. [`RecordRepository`] turns typed records,
//! filters, and patches into storage documents through the [`FieldMapper`]
//! and hands them to a [`MetadataStore`](pathvault_core::traits::MetadataStore):
//! either the in-process [`MemoryMetadataStore`] or the PostgreSQL-backed
//! [`PgMetadataStore`].

pub mod connection;
pub mod mapping;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use mapping::FieldMapper;
pub use repositories::RecordRepository;
pub use store::{MemoryMetadataStore, PgMetadataStore, open_store};
