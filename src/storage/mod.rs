//! Record file storage used by `FileStore`
//!
//! The record file holds the canonical persistent state of all records.
//!
//! # Design Principles
//!
//! - Append-only (no in-place updates)
//! - Checksum-verified on every read
//! - Latest entry wins for the same `collection:record_id`
//! - A commit batch lands completely or not at all
//! - Halt on corruption: a bad entry is never skipped

mod checksum;
mod errors;
mod reader;
mod record;
mod writer;

pub use checksum::compute_checksum;
pub use errors::{StorageError, StorageResult};
pub use reader::StorageReader;
pub use record::{entry_key, RecordEntry};
pub use writer::{StorageWriter, RECORD_FILE};
