//! File and folder record models.

pub mod filter;
pub mod model;

pub use filter::{RecordFilter, RecordPatch};
pub use model::{FileRecord, NewRecord, fields};
