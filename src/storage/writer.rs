//! Record file writer with fsync enforcement
//!
//! - Append-only, no in-place updates
//! - A batch is appended with a single write followed by fsync
//! - A failed batch is truncated away, so the file never keeps a partial batch

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::errors::{StorageError, StorageResult};
use super::reader::StorageReader;
use super::record::RecordEntry;
use crate::observability::Event;

/// Name of the record file under `<data_dir>/data/`
pub const RECORD_FILE: &str = "records.dat";

/// Writer that owns `records.dat` and its in-memory offset index.
pub struct StorageWriter {
    storage_path: PathBuf,
    file: File,
    current_offset: u64,
    /// key -> offset of the latest entry
    offsets: HashMap<String, u64>,
    /// keys in first-write order
    order: Vec<String>,
}

impl StorageWriter {
    /// Opens or creates `<data_dir>/data/records.dat` and rebuilds the index.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let data_subdir = data_dir.join("data");
        let storage_path = data_subdir.join(RECORD_FILE);

        fs::create_dir_all(&data_subdir).map_err(|e| {
            StorageError::write_failed(
                format!("Failed to create data directory: {}", data_subdir.display()),
                e,
            )
        })?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&storage_path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open record file: {}", storage_path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();

        let (offsets, order) = if current_offset == 0 {
            (HashMap::new(), Vec::new())
        } else {
            StorageReader::open(&storage_path)?.build_offset_index()?
        };

        Ok(Self {
            storage_path,
            file,
            current_offset,
            offsets,
            order,
        })
    }

    /// Returns the path to the record file.
    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Returns the current end-of-file offset.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Offset of the latest entry for `key`.
    pub fn offset_of(&self, key: &str) -> Option<u64> {
        self.offsets.get(key).copied()
    }

    /// Keys in first-write order.
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    /// Appends `entries` as one unit.
    ///
    /// Either every entry is written and synced, or the file is truncated
    /// back to its previous length and the index is left untouched.
    ///
    /// # Errors
    ///
    /// `SCOPE_STORAGE_WRITE_FAILED` if the write or fsync fails.
    pub fn append_batch(&mut self, entries: &[RecordEntry]) -> StorageResult<Vec<u64>> {
        let start = self.current_offset;
        let mut buf = Vec::new();
        let mut positions = Vec::with_capacity(entries.len());

        for entry in entries {
            positions.push(start + buf.len() as u64);
            buf.extend_from_slice(&entry.serialize());
        }

        if let Err(e) = self
            .file
            .write_all(&buf)
            .and_then(|_| self.file.sync_all())
        {
            self.truncate_to(start)?;
            return Err(StorageError::write_failed(
                format!("Failed to append {} entries", entries.len()),
                e,
            ));
        }

        self.current_offset = start + buf.len() as u64;
        for (entry, offset) in entries.iter().zip(&positions) {
            let key = entry.key();
            if self.offsets.insert(key.clone(), *offset).is_none() {
                self.order.push(key);
            }
        }

        debug!(
            event = Event::StorageCommit.as_str(),
            entries = entries.len(),
            offset = start,
            "record file synced"
        );

        Ok(positions)
    }

    /// Drops everything past `offset`.
    ///
    /// If the file cannot be truncated, the end offset is re-read from the
    /// file so the writer never assumes bytes that are still there are gone.
    fn truncate_to(&mut self, offset: u64) -> StorageResult<()> {
        if let Err(e) = self.file.set_len(offset).and_then(|_| self.file.sync_all()) {
            if let Ok(metadata) = self.file.metadata() {
                self.current_offset = metadata.len();
            }
            warn!(
                event = Event::WriteRolledBack.as_str(),
                offset,
                file_len = self.current_offset,
                error = %e,
                "failed to truncate record file after aborted append"
            );
            return Err(StorageError::write_failed(
                format!("Failed to truncate record file to {} after aborted append", offset),
                e,
            ));
        }
        Ok(())
    }
}
