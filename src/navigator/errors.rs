//! Navigator errors

use thiserror::Error;

use crate::codec::CoercionError;
use crate::records::WriteError;
use crate::schema::SchemaError;
use crate::store::StoreError;

/// Result type for navigator operations
pub type NavigatorResult<T> = Result<T, NavigatorError>;

#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("index {index} out of range ({len} rows)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{operation} is not available in the {frame} view")]
    InvalidTransition {
        operation: &'static str,
        frame: &'static str,
    },

    #[error("session has been dismissed")]
    Dismissed,

    #[error("edit mode is off")]
    NotInEditMode,

    #[error("field '{field}' does not belong to collection '{collection}'")]
    ForeignField { field: String, collection: String },

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl NavigatorError {
    /// Stable code for error responses
    pub fn code(&self) -> &'static str {
        match self {
            NavigatorError::IndexOutOfRange { .. } => "SCOPE_INDEX_OUT_OF_RANGE",
            NavigatorError::InvalidTransition { .. } => "SCOPE_INVALID_TRANSITION",
            NavigatorError::Dismissed => "SCOPE_SESSION_DISMISSED",
            NavigatorError::NotInEditMode => "SCOPE_NOT_IN_EDIT_MODE",
            NavigatorError::ForeignField { .. } => "SCOPE_FOREIGN_FIELD",
            NavigatorError::Coercion(e) => e.code(),
            NavigatorError::Write(e) => e.code(),
            NavigatorError::Store(e) => e.code(),
            NavigatorError::Schema(e) => e.code().code(),
        }
    }

    /// Whether the session cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        match self {
            NavigatorError::Schema(e) => e.is_fatal(),
            _ => false,
        }
    }

    /// Whether this is a rejected edit the operator can retry.
    pub fn is_edit_rejection(&self) -> bool {
        matches!(self, NavigatorError::Coercion(_) | NavigatorError::Write(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through() {
        let err = NavigatorError::from(CoercionError::InvalidInt {
            input: "x".into(),
        });
        assert_eq!(err.code(), "SCOPE_INVALID_INT");
        assert!(err.is_edit_rejection());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_unavailable_schema_is_fatal() {
        let err = NavigatorError::from(SchemaError::unavailable("disk gone"));
        assert!(err.is_fatal());
        assert_eq!(err.code(), "SCOPE_SCHEMA_UNAVAILABLE");
    }
}
