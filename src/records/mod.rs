//! Record access
//!
//! `RecordStore` is the thin transactional accessor between the navigator
//! and a [`Store`]. Reads are always fresh; nothing is cached here.
//!
//! A write goes through exactly one transaction:
//!
//! ```text
//! begin_write → put_field → commit_write
//!        └──── any failure ────→ rollback_write → StoreRejected
//! ```
//!
//! Fields that can never be written (relations, lists, unsupported types)
//! and values of the wrong kind are refused before a transaction is opened.

mod errors;

pub use errors::WriteError;

use std::sync::Arc;

use tracing::{info, warn};

use crate::codec::{decode, encode, TypedValue, Value};
use crate::observability::Event;
use crate::schema::{CollectionDescriptor, FieldDescriptor};
use crate::store::{RecordId, Store, StoreError, StoreResult};

/// Handle to one record and the collection it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub collection: Arc<CollectionDescriptor>,
}

impl Record {
    pub fn new(id: RecordId, collection: Arc<CollectionDescriptor>) -> Self {
        Self { id, collection }
    }
}

pub struct RecordStore<S: Store> {
    store: S,
}

impl<S: Store> RecordStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every record of `collection`, read fresh from the store.
    pub fn records_in(&self, collection: &Arc<CollectionDescriptor>) -> StoreResult<Vec<Record>> {
        Ok(self
            .store
            .record_ids(&collection.name)?
            .into_iter()
            .map(|id| Record::new(id, Arc::clone(collection)))
            .collect())
    }

    pub fn record_count(&self, collection: &CollectionDescriptor) -> StoreResult<usize> {
        Ok(self.store.record_ids(&collection.name)?.len())
    }

    /// Current value of `field` on `record`. Relations come back as
    /// `Value::Links`.
    pub fn raw_value(&self, record: &Record, field: &FieldDescriptor) -> StoreResult<Value> {
        let json = self
            .store
            .read_field(&record.collection.name, &record.id, &field.name)?;
        Ok(decode(json, field))
    }

    /// Resolves a relation field into records of `target`.
    ///
    /// Ids that no longer exist in the target collection are skipped.
    pub fn linked_records(
        &self,
        record: &Record,
        field: &FieldDescriptor,
        target: &Arc<CollectionDescriptor>,
    ) -> StoreResult<Vec<Record>> {
        let ids = match self.raw_value(record, field)? {
            Value::Links(ids) => ids,
            _ => return Ok(Vec::new()),
        };

        let existing = self.store.record_ids(&target.name)?;
        Ok(ids
            .into_iter()
            .filter(|id| existing.contains(id))
            .map(|id| Record::new(id, Arc::clone(target)))
            .collect())
    }

    /// Writes `value` into `field` of `record` inside one committed
    /// transaction.
    pub fn commit(
        &mut self,
        record: &Record,
        field: &FieldDescriptor,
        value: TypedValue,
    ) -> Result<(), WriteError> {
        if !field.is_editable() {
            return Err(WriteError::NotEditable {
                field: field.name.clone(),
            });
        }

        if value.kind() != field.kind {
            return Err(WriteError::TypeMismatch {
                field: field.name.clone(),
                expected: field.kind.as_str(),
                actual: value.kind().as_str(),
            });
        }

        match self.write_field(record, field, &value) {
            Ok(()) => {
                info!(
                    event = Event::EditCommitted.as_str(),
                    collection = %record.collection.name,
                    record = %record.id,
                    field = %field.name,
                    "edit committed"
                );
                Ok(())
            }
            Err(e) => {
                self.store.rollback_write();
                warn!(
                    event = Event::WriteRolledBack.as_str(),
                    collection = %record.collection.name,
                    record = %record.id,
                    field = %field.name,
                    code = e.code(),
                    error = %e,
                    "write rolled back"
                );
                Err(WriteError::StoreRejected {
                    reason: e.to_string(),
                })
            }
        }
    }

    fn write_field(
        &mut self,
        record: &Record,
        field: &FieldDescriptor,
        value: &TypedValue,
    ) -> Result<(), StoreError> {
        self.store.begin_write()?;
        self.store
            .put_field(&record.collection.name, &record.id, &field.name, encode(value))?;
        self.store.commit_write()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
