//! Store handles
//!
//! The browser never reaches for a global store. A `Store` is injected at
//! construction and is the single seam between the browsing core and the
//! persisted data. Two backends ship with the crate:
//!
//! - [`FileStore`]: schema files plus an append-only, checksummed record file
//! - [`MemoryStore`]: everything in process memory
//!
//! # Write protocol
//!
//! `begin_write` → one or more `put_field` → `commit_write`, or
//! `rollback_write` at any point. Nothing staged is observable through the
//! read methods until `commit_write` returns `Ok`.

mod errors;
mod file;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{CollectionSchema, SchemaError, SchemaValidator};

/// Full JSON body of one record
pub type Document = Map<String, Value>;

/// Opaque handle of a record within its collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id for an inserted record.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A schema-described store of typed records.
pub trait Store {
    /// Every collection schema, in the store's natural order.
    fn schemas(&self) -> StoreResult<Vec<CollectionSchema>>;

    /// Ids of every committed record in `collection`.
    fn record_ids(&self, collection: &str) -> StoreResult<Vec<RecordId>>;

    /// Committed value of one field; `None` when the field is unset.
    fn read_field(&self, collection: &str, id: &RecordId, field: &str)
        -> StoreResult<Option<Value>>;

    /// Opens a write transaction.
    fn begin_write(&mut self) -> StoreResult<()>;

    /// Stages a single field value inside the open transaction.
    fn put_field(
        &mut self,
        collection: &str,
        id: &RecordId,
        field: &str,
        value: Value,
    ) -> StoreResult<()>;

    /// Makes every staged change durable and visible, then closes the transaction.
    fn commit_write(&mut self) -> StoreResult<()>;

    /// Discards staged changes and closes the transaction. No-op without one.
    fn rollback_write(&mut self);
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn schemas(&self) -> StoreResult<Vec<CollectionSchema>> {
        (**self).schemas()
    }

    fn record_ids(&self, collection: &str) -> StoreResult<Vec<RecordId>> {
        (**self).record_ids(collection)
    }

    fn read_field(
        &self,
        collection: &str,
        id: &RecordId,
        field: &str,
    ) -> StoreResult<Option<Value>> {
        (**self).read_field(collection, id, field)
    }

    fn begin_write(&mut self) -> StoreResult<()> {
        (**self).begin_write()
    }

    fn put_field(
        &mut self,
        collection: &str,
        id: &RecordId,
        field: &str,
        value: Value,
    ) -> StoreResult<()> {
        (**self).put_field(collection, id, field, value)
    }

    fn commit_write(&mut self) -> StoreResult<()> {
        (**self).commit_write()
    }

    fn rollback_write(&mut self) {
        (**self).rollback_write()
    }
}

/// Sets `field` on `document` after checking it against `schema`.
fn apply_field(
    schema: &CollectionSchema,
    document: &mut Document,
    field: &str,
    value: Value,
) -> StoreResult<()> {
    let def = schema.field(field).ok_or_else(|| {
        StoreError::from(SchemaError::document_invalid(
            &schema.name,
            field,
            "undeclared field",
        ))
    })?;

    SchemaValidator::new(schema).validate_value(field, &def.field_type, &value)?;
    document.insert(field.to_string(), value);
    Ok(())
}
