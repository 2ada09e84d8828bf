//! Record file reader with strict corruption detection
//!
//! - Every read validates the entry checksum
//! - Any checksum or framing failure aborts the read

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::{RecordEntry, MIN_ENTRY_SIZE};

/// Sequential scans and offset lookups over the record file.
pub struct StorageReader {
    storage_path: PathBuf,
    reader: BufReader<File>,
    current_offset: u64,
    file_size: u64,
}

impl StorageReader {
    /// Opens the record file for reading.
    pub fn open(storage_path: &Path) -> StorageResult<Self> {
        let file = File::open(storage_path).map_err(|e| {
            StorageError::read_failed(
                format!("Failed to open record file: {}", storage_path.display()),
                e,
            )
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            storage_path: storage_path.to_path_buf(),
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
        })
    }

    /// Returns the record file path.
    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Returns the current read offset.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Reads the next entry.
    ///
    /// - `Ok(Some(entry))` if an entry was read
    /// - `Ok(None)` at end of file
    /// - `Err(SCOPE_DATA_CORRUPTION)` on checksum or framing failure
    pub fn read_next(&mut self) -> StorageResult<Option<RecordEntry>> {
        if self.current_offset >= self.file_size {
            return Ok(None);
        }

        let remaining = self.file_size - self.current_offset;

        if remaining < MIN_ENTRY_SIZE as u64 {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Truncated record file: {} bytes remaining, minimum entry size is {}",
                    remaining, MIN_ENTRY_SIZE
                ),
            ));
        }

        let mut len_buf = [0u8; 4];
        self.reader.read_exact(&mut len_buf).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read entry length: {}", e),
            )
        })?;
        let entry_length = u32::from_le_bytes(len_buf) as u64;

        if entry_length < MIN_ENTRY_SIZE as u64 || entry_length > remaining {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Invalid entry length {} ({} bytes remaining)",
                    entry_length, remaining
                ),
            ));
        }

        let mut entry_buf = vec![0u8; entry_length as usize];
        entry_buf[0..4].copy_from_slice(&len_buf);

        self.reader.read_exact(&mut entry_buf[4..]).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read entry body: {}", e),
            )
        })?;

        let (entry, consumed) = RecordEntry::deserialize(&entry_buf)
            .map_err(|e| StorageError::corruption_at_offset(self.current_offset, e.to_string()))?;

        self.current_offset += consumed as u64;

        Ok(Some(entry))
    }

    /// Seeks to a specific offset in the file.
    pub fn seek_to(&mut self, offset: u64) -> StorageResult<()> {
        self.reader.seek(SeekFrom::Start(offset)).map_err(|e| {
            StorageError::read_failed(format!("Failed to seek to offset {}", offset), e)
        })?;
        self.current_offset = offset;
        Ok(())
    }

    /// Reads a single entry at the specified offset.
    pub fn read_at(&mut self, offset: u64) -> StorageResult<RecordEntry> {
        self.seek_to(offset)?;
        self.read_next()?
            .ok_or_else(|| StorageError::corruption_at_offset(offset, "No entry at specified offset"))
    }

    /// Builds `key -> offset of latest entry` plus keys in first-write order.
    pub fn build_offset_index(&mut self) -> StorageResult<(HashMap<String, u64>, Vec<String>)> {
        self.seek_to(0)?;

        let mut offsets = HashMap::new();
        let mut order = Vec::new();

        loop {
            let offset = self.current_offset;
            match self.read_next()? {
                Some(entry) => {
                    let key = entry.key();
                    if offsets.insert(key.clone(), offset).is_none() {
                        order.push(key);
                    }
                }
                None => break,
            }
        }

        Ok((offsets, order))
    }
}

#[cfg(test)]
mod tests {
    use super::super::writer::StorageWriter;
    use super::*;
    use tempfile::TempDir;

    fn entry(id: &str, body: &str) -> RecordEntry {
        RecordEntry::new("Person", id, body.as_bytes().to_vec())
    }

    #[test]
    fn test_read_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let writer = StorageWriter::open(temp_dir.path()).unwrap();

        let mut reader = StorageReader::open(writer.path()).unwrap();
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_read_multiple_entries() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
        writer
            .append_batch(&[entry("p1", "{}"), entry("p2", "{}"), entry("p3", "{}")])
            .unwrap();

        let mut reader = StorageReader::open(writer.path()).unwrap();
        let mut ids = Vec::new();
        while let Some(entry) = reader.read_next().unwrap() {
            ids.push(entry.record_id);
        }
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_corruption_detected() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
        writer.append_batch(&[entry("p1", r#"{"age":30}"#)]).unwrap();

        {
            use std::fs::OpenOptions;
            use std::io::{Seek, SeekFrom, Write};

            let mut file = OpenOptions::new().write(true).open(writer.path()).unwrap();
            file.seek(SeekFrom::Start(10)).unwrap();
            file.write_all(&[0xFF]).unwrap();
        }

        let mut reader = StorageReader::open(writer.path()).unwrap();
        let err = reader.read_next().unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.code(), "SCOPE_DATA_CORRUPTION");
    }

    #[test]
    fn test_offset_index_latest_wins_first_order_kept() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
        writer.append_batch(&[entry("p1", "1"), entry("p2", "2")]).unwrap();
        writer.append_batch(&[entry("p1", "3")]).unwrap();

        let mut reader = StorageReader::open(writer.path()).unwrap();
        let (offsets, order) = reader.build_offset_index().unwrap();

        assert_eq!(order, vec!["Person:p1".to_string(), "Person:p2".to_string()]);
        let latest = reader.read_at(offsets["Person:p1"]).unwrap();
        assert_eq!(latest.body, b"3");
    }
}
