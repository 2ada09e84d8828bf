//! Schema error types
//!
//! Error codes:
//! - SCOPE_SCHEMA_UNAVAILABLE (FATAL)
//! - SCOPE_MALFORMED_SCHEMA (FATAL)
//! - SCOPE_SCHEMA_EXISTS (REJECT)
//! - SCOPE_UNKNOWN_COLLECTION (REJECT)
//! - SCOPE_DOCUMENT_INVALID (REJECT)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected, session continues
    Reject,
    /// Browsing session cannot start
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Store metadata could not be read
    SchemaUnavailable,
    /// Store metadata is present but unusable
    MalformedSchema,
    /// Collection already defined
    SchemaExists,
    /// Collection name not found
    UnknownCollection,
    /// Document does not match its collection schema
    DocumentInvalid,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SchemaUnavailable => "SCOPE_SCHEMA_UNAVAILABLE",
            SchemaErrorCode::MalformedSchema => "SCOPE_MALFORMED_SCHEMA",
            SchemaErrorCode::SchemaExists => "SCOPE_SCHEMA_EXISTS",
            SchemaErrorCode::UnknownCollection => "SCOPE_UNKNOWN_COLLECTION",
            SchemaErrorCode::DocumentInvalid => "SCOPE_DOCUMENT_INVALID",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::SchemaUnavailable | SchemaErrorCode::MalformedSchema => {
                Severity::Fatal
            }
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    collection: Option<String>,
}

impl SchemaError {
    /// Store metadata could not be read at all
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::SchemaUnavailable,
            message: format!("Store metadata unavailable: {}", reason.into()),
            collection: None,
        }
    }

    /// Schema file or registration is structurally invalid
    pub fn malformed_schema(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MalformedSchema,
            message: format!("Malformed schema '{}': {}", source.into(), reason.into()),
            collection: None,
        }
    }

    pub fn schema_exists(collection: impl Into<String>) -> Self {
        let name = collection.into();
        Self {
            code: SchemaErrorCode::SchemaExists,
            message: format!("Collection '{}' is already defined", name),
            collection: Some(name),
        }
    }

    pub fn unknown_collection(collection: impl Into<String>) -> Self {
        let name = collection.into();
        Self {
            code: SchemaErrorCode::UnknownCollection,
            message: format!("Collection '{}' not found", name),
            collection: Some(name),
        }
    }

    /// Document failed validation against its collection schema
    pub fn document_invalid(
        collection: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let name = collection.into();
        Self {
            code: SchemaErrorCode::DocumentInvalid,
            message: format!("field '{}': {}", field.into(), reason.into()),
            collection: Some(name),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the collection name if applicable
    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// Returns whether this error prevents a session from starting
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_is_fatal() {
        let err = SchemaError::unavailable("permission denied");
        assert!(err.is_fatal());
        assert_eq!(err.code().code(), "SCOPE_SCHEMA_UNAVAILABLE");
    }

    #[test]
    fn test_document_invalid_is_recoverable() {
        let err = SchemaError::document_invalid("Person", "age", "expected int, got string");
        assert!(!err.is_fatal());
        assert_eq!(err.collection(), Some("Person"));
    }

    #[test]
    fn test_display_contains_code_and_severity() {
        let err = SchemaError::unknown_collection("Ghost");
        let display = format!("{}", err);
        assert!(display.contains("REJECT"));
        assert!(display.contains("SCOPE_UNKNOWN_COLLECTION"));
        assert!(display.contains("Ghost"));
    }
}
