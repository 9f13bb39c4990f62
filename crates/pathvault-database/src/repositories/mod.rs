//! Typed repositories over a metadata store.

pub mod record;

pub use record::RecordRepository;
