//! In-memory store.
//!
//! Keeps schemas in registration order and records in insertion order.
//! Useful for embedding the browser over data that lives elsewhere, and as
//! the fake store in tests.

use std::collections::HashMap;

use serde_json::Value;

use super::{apply_field, Document, RecordId, Store, StoreError, StoreResult};
use crate::schema::{CollectionSchema, SchemaError, SchemaValidator};

#[derive(Debug, Default)]
pub struct MemoryStore {
    schemas: Vec<CollectionSchema>,
    records: HashMap<String, Vec<(RecordId, Document)>>,
    staged: Option<Vec<(String, RecordId, Document)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collection. Collections are immutable once defined.
    pub fn define_collection(&mut self, schema: CollectionSchema) -> StoreResult<()> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(&schema.name, e))?;

        if self.schema(&schema.name).is_ok() {
            return Err(SchemaError::schema_exists(&schema.name).into());
        }

        self.records.insert(schema.name.clone(), Vec::new());
        self.schemas.push(schema);
        Ok(())
    }

    /// Inserts a validated document under a fresh id.
    pub fn insert(&mut self, collection: &str, document: Document) -> StoreResult<RecordId> {
        let id = RecordId::generate();
        self.insert_with_id(collection, id.clone(), document)?;
        Ok(id)
    }

    /// Inserts a validated document under a caller-chosen id.
    pub fn insert_with_id(
        &mut self,
        collection: &str,
        id: RecordId,
        document: Document,
    ) -> StoreResult<()> {
        SchemaValidator::new(self.schema(collection)?).validate_document(&document)?;

        let records = self
            .records
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;

        match records.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => *slot = document,
            None => records.push((id, document)),
        }
        Ok(())
    }

    fn schema(&self, collection: &str) -> StoreResult<&CollectionSchema> {
        self.schemas
            .iter()
            .find(|s| s.name == collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
    }

    fn document(&self, collection: &str, id: &RecordId) -> StoreResult<&Document> {
        self.records
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, document)| document)
            .ok_or_else(|| StoreError::RecordNotFound {
                collection: collection.to_string(),
                record_id: id.to_string(),
            })
    }
}

impl Store for MemoryStore {
    fn schemas(&self) -> StoreResult<Vec<CollectionSchema>> {
        Ok(self.schemas.clone())
    }

    fn record_ids(&self, collection: &str) -> StoreResult<Vec<RecordId>> {
        let records = self
            .records
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(records.iter().map(|(id, _)| id.clone()).collect())
    }

    fn read_field(
        &self,
        collection: &str,
        id: &RecordId,
        field: &str,
    ) -> StoreResult<Option<Value>> {
        Ok(self.document(collection, id)?.get(field).cloned())
    }

    fn begin_write(&mut self) -> StoreResult<()> {
        if self.staged.is_some() {
            return Err(StoreError::TransactionOpen);
        }
        self.staged = Some(Vec::new());
        Ok(())
    }

    fn put_field(
        &mut self,
        collection: &str,
        id: &RecordId,
        field: &str,
        value: Value,
    ) -> StoreResult<()> {
        let staged_doc = self
            .staged
            .as_ref()
            .ok_or(StoreError::NoTransaction)?
            .iter()
            .find(|(c, existing, _)| c == collection && existing == id)
            .map(|(_, _, document)| document.clone());

        let mut document = match staged_doc {
            Some(document) => document,
            None => self.document(collection, id)?.clone(),
        };
        apply_field(self.schema(collection)?, &mut document, field, value)?;

        let staged = self.staged.as_mut().ok_or(StoreError::NoTransaction)?;
        staged.retain(|(c, existing, _)| !(c == collection && existing == id));
        staged.push((collection.to_string(), id.clone(), document));
        Ok(())
    }

    fn commit_write(&mut self) -> StoreResult<()> {
        let staged = self.staged.take().ok_or(StoreError::NoTransaction)?;
        for (collection, id, document) in staged {
            if let Some(records) = self.records.get_mut(&collection) {
                if let Some((_, slot)) = records.iter_mut().find(|(existing, _)| *existing == id) {
                    *slot = document;
                }
            }
        }
        Ok(())
    }

    fn rollback_write(&mut self) {
        self.staged = None;
    }
}
