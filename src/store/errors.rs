//! Store error types

use thiserror::Error;

use crate::schema::SchemaError;
use crate::storage::StorageError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by a `Store` backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("record not found: {collection}:{record_id}")]
    RecordNotFound {
        collection: String,
        record_id: String,
    },

    #[error("no write transaction is open")]
    NoTransaction,

    #[error("a write transaction is already open")]
    TransactionOpen,

    #[error("stored record {0} is not a JSON object")]
    CorruptDocument(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("store rejected the write: {0}")]
    Rejected(String),
}

impl StoreError {
    /// Stable code for CLI error responses
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::UnknownCollection(_) => "SCOPE_UNKNOWN_COLLECTION",
            StoreError::RecordNotFound { .. } => "SCOPE_RECORD_NOT_FOUND",
            StoreError::NoTransaction | StoreError::TransactionOpen => "SCOPE_TRANSACTION_STATE",
            StoreError::CorruptDocument(_) => "SCOPE_DATA_CORRUPTION",
            StoreError::Schema(e) => e.code().code(),
            StoreError::Storage(e) => e.code(),
            StoreError::Rejected(_) => "SCOPE_STORE_REJECTED",
        }
    }
}
