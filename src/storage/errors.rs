//! Record file errors
//!
//! Error codes:
//! - SCOPE_STORAGE_WRITE_FAILED
//! - SCOPE_STORAGE_READ_FAILED
//! - SCOPE_DATA_CORRUPTION (fatal: the record file cannot be trusted)

use std::io;

use thiserror::Error;

/// Result type for record file operations
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record file write failed: {context}")]
    WriteFailed {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("record file read failed: {context}")]
    ReadFailed {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("record file corrupted at byte {offset}: {reason}")]
    Corruption { offset: u64, reason: String },
}

impl StorageError {
    pub fn write_failed(context: impl Into<String>, source: io::Error) -> Self {
        StorageError::WriteFailed {
            context: context.into(),
            source,
        }
    }

    pub fn read_failed(context: impl Into<String>, source: io::Error) -> Self {
        StorageError::ReadFailed {
            context: context.into(),
            source,
        }
    }

    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        StorageError::Corruption {
            offset,
            reason: reason.into(),
        }
    }

    /// Stable code for error responses
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::WriteFailed { .. } => "SCOPE_STORAGE_WRITE_FAILED",
            StorageError::ReadFailed { .. } => "SCOPE_STORAGE_READ_FAILED",
            StorageError::Corruption { .. } => "SCOPE_DATA_CORRUPTION",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, StorageError::Corruption { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corruption_is_fatal() {
        let err = StorageError::corruption_at_offset(1024, "checksum mismatch");
        assert!(err.is_fatal());
        assert_eq!(err.code(), "SCOPE_DATA_CORRUPTION");
        assert_eq!(
            err.to_string(),
            "record file corrupted at byte 1024: checksum mismatch"
        );
    }

    #[test]
    fn test_write_failed_keeps_source() {
        let err = StorageError::write_failed(
            "disk full",
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        assert!(!err.is_fatal());
        assert!(std::error::Error::source(&err).is_some());
    }
}
