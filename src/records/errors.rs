//! Write errors

use thiserror::Error;

/// Failure of a single field write.
///
/// Every variant is recoverable. When a transaction was opened it has been
/// rolled back by the time the caller sees the error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error("write rejected: {reason}")]
    StoreRejected { reason: String },

    #[error("field '{field}' expects {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("field '{field}' cannot be edited")]
    NotEditable { field: String },
}

impl WriteError {
    /// Stable code for error responses
    pub fn code(&self) -> &'static str {
        match self {
            WriteError::StoreRejected { .. } => "SCOPE_STORE_REJECTED",
            WriteError::TypeMismatch { .. } => "SCOPE_TYPE_MISMATCH",
            WriteError::NotEditable { .. } => "SCOPE_NOT_EDITABLE",
        }
    }
}
