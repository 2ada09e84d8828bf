//! Record file entry format
//!
//! ```text
//! +------------------+
//! | Entry Length     | (u32 LE, includes itself and the checksum)
//! +------------------+
//! | Collection       | (length-prefixed string)
//! +------------------+
//! | Record ID        | (length-prefixed string)
//! +------------------+
//! | Body             | (length-prefixed JSON object bytes)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself.

use std::io::{self, Read};

/// Smallest possible entry: length + three empty length-prefixed fields + checksum
pub const MIN_ENTRY_SIZE: usize = 4 + 4 + 4 + 4 + 4;

/// One full-document entry in the record file. Latest entry per key wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    pub collection: String,
    pub record_id: String,
    /// Serialized JSON object
    pub body: Vec<u8>,
}

impl RecordEntry {
    pub fn new(collection: impl Into<String>, record_id: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            collection: collection.into(),
            record_id: record_id.into(),
            body,
        }
    }

    /// Composite key `collection:record_id`
    pub fn key(&self) -> String {
        entry_key(&self.collection, &self.record_id)
    }

    fn serialize_body(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        for part in [self.collection.as_bytes(), self.record_id.as_bytes(), self.body.as_slice()] {
            buf.extend_from_slice(&(part.len() as u32).to_le_bytes());
            buf.extend_from_slice(part);
        }

        buf
    }

    /// Serialize the complete entry to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();
        let entry_length = (4 + body.len() + 4) as u32;

        let mut entry = Vec::with_capacity(entry_length as usize);
        entry.extend_from_slice(&entry_length.to_le_bytes());
        entry.extend_from_slice(&body);

        let checksum = super::checksum::compute_checksum(&entry);
        entry.extend_from_slice(&checksum.to_le_bytes());

        entry
    }

    /// Deserialize an entry from bytes, verifying its checksum.
    ///
    /// Returns the entry and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_ENTRY_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Entry too short",
            ));
        }

        let entry_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if entry_length < MIN_ENTRY_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid entry length: {}", entry_length),
            ));
        }

        if data.len() < entry_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Entry truncated: expected {} bytes, got {}",
                    entry_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = entry_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);

        if !super::checksum::verify_checksum(&data[..checksum_offset], stored_checksum) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    super::checksum::compute_checksum(&data[..checksum_offset]),
                    stored_checksum
                ),
            ));
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);

        fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
            let mut len_buf = [0u8; 4];
            reader.read_exact(&mut len_buf)?;
            let len = u32::from_le_bytes(len_buf) as usize;

            let mut buf = vec![0u8; len];
            reader.read_exact(&mut buf)?;
            Ok(buf)
        }

        fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
            String::from_utf8(read_bytes(reader)?).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e))
            })
        }

        let collection = read_string(&mut cursor)?;
        let record_id = read_string(&mut cursor)?;
        let body = read_bytes(&mut cursor)?;

        Ok((
            Self {
                collection,
                record_id,
                body,
            },
            entry_length,
        ))
    }
}

/// Builds the composite key used to index entries.
pub fn entry_key(collection: &str, record_id: &str) -> String {
    format!("{}:{}", collection, record_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> RecordEntry {
        RecordEntry::new("Person", "p1", br#"{"name":"Alice","age":30}"#.to_vec())
    }

    #[test]
    fn test_entry_roundtrip() {
        let entry = sample_entry();
        let serialized = entry.serialize();
        let (deserialized, consumed) = RecordEntry::deserialize(&serialized).unwrap();

        assert_eq!(entry, deserialized);
        assert_eq!(consumed, serialized.len());
    }

    #[test]
    fn test_checksum_detects_corruption() {
        let mut serialized = sample_entry().serialize();
        let mid = serialized.len() / 2;
        serialized[mid] ^= 0xFF;

        let err = RecordEntry::deserialize(&serialized).unwrap_err();
        assert!(err.to_string().contains("Checksum mismatch"));
    }

    #[test]
    fn test_truncated_entry_rejected() {
        let serialized = sample_entry().serialize();
        let err = RecordEntry::deserialize(&serialized[..serialized.len() - 3]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_composite_key() {
        assert_eq!(sample_entry().key(), "Person:p1");
    }
}
