//! Coercion errors

use thiserror::Error;

use crate::schema::FieldKind;

/// Operator text that cannot become a value of the field's type.
///
/// Always recoverable: the field stays in edit mode for a retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("'{input}' is not a boolean (use true/false or 1/0)")]
    InvalidBool { input: String },

    #[error("'{input}' is not a whole number")]
    InvalidInt { input: String },

    #[error("'{input}' is not a number")]
    InvalidNumber { input: String },

    #[error("{kind} field '{field}' cannot be edited")]
    NotEditable { field: String, kind: &'static str },
}

impl CoercionError {
    pub fn not_editable(field: impl Into<String>, kind: FieldKind, collection_valued: bool) -> Self {
        Self::NotEditable {
            field: field.into(),
            kind: if collection_valued { "list" } else { kind.as_str() },
        }
    }

    /// Stable code for error responses
    pub fn code(&self) -> &'static str {
        match self {
            CoercionError::InvalidBool { .. } => "SCOPE_INVALID_BOOL",
            CoercionError::InvalidInt { .. } => "SCOPE_INVALID_INT",
            CoercionError::InvalidNumber { .. } => "SCOPE_INVALID_NUMBER",
            CoercionError::NotEditable { .. } => "SCOPE_NOT_EDITABLE",
        }
    }
}
