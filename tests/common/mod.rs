//! Shared fixtures for integration tests

#![allow(dead_code)]

use recordscope::schema::{CollectionSchema, FieldDef};
use recordscope::store::{Document, MemoryStore, RecordId, Store, StoreError, StoreResult};
use serde_json::{json, Value};

pub fn doc(value: Value) -> Document {
    value.as_object().cloned().expect("fixture documents are objects")
}

pub fn person_schema() -> CollectionSchema {
    CollectionSchema::new(
        "Person",
        vec![
            FieldDef::string("name"),
            FieldDef::int("age"),
            FieldDef::list("dogs", "Dog"),
        ],
    )
}

pub fn dog_schema() -> CollectionSchema {
    CollectionSchema::new("Dog", vec![FieldDef::string("name"), FieldDef::bool("good")])
}

/// Person(Alice 30, Bob 41) and Dog(Rex), with only Alice owning a dog.
pub fn person_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.define_collection(person_schema()).unwrap();
    store.define_collection(dog_schema()).unwrap();
    store
        .define_collection(CollectionSchema::new("Cat", vec![FieldDef::string("name")]))
        .unwrap();

    store
        .insert_with_id("Dog", "d1".into(), doc(json!({"name": "Rex", "good": true})))
        .unwrap();
    store
        .insert_with_id(
            "Person",
            "p1".into(),
            doc(json!({"name": "Alice", "age": 30, "dogs": ["d1"]})),
        )
        .unwrap();
    store
        .insert_with_id(
            "Person",
            "p2".into(),
            doc(json!({"name": "Bob", "age": 41, "dogs": []})),
        )
        .unwrap();
    store
}

/// Store wrapper that counts transactions and can refuse every commit.
pub struct CountingStore {
    pub inner: MemoryStore,
    pub reject_commits: bool,
    pub begins: usize,
    pub rollbacks: usize,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            reject_commits: false,
            begins: 0,
            rollbacks: 0,
        }
    }

    pub fn rejecting(inner: MemoryStore) -> Self {
        Self {
            reject_commits: true,
            ..Self::new(inner)
        }
    }
}

impl Store for CountingStore {
    fn schemas(&self) -> StoreResult<Vec<CollectionSchema>> {
        self.inner.schemas()
    }

    fn record_ids(&self, collection: &str) -> StoreResult<Vec<RecordId>> {
        self.inner.record_ids(collection)
    }

    fn read_field(
        &self,
        collection: &str,
        id: &RecordId,
        field: &str,
    ) -> StoreResult<Option<Value>> {
        self.inner.read_field(collection, id, field)
    }

    fn begin_write(&mut self) -> StoreResult<()> {
        self.begins += 1;
        self.inner.begin_write()
    }

    fn put_field(
        &mut self,
        collection: &str,
        id: &RecordId,
        field: &str,
        value: Value,
    ) -> StoreResult<()> {
        self.inner.put_field(collection, id, field, value)
    }

    fn commit_write(&mut self) -> StoreResult<()> {
        if self.reject_commits {
            return Err(StoreError::Rejected("disk full".into()));
        }
        self.inner.commit_write()
    }

    fn rollback_write(&mut self) {
        self.rollbacks += 1;
        self.inner.rollback_write()
    }
}

/// Store whose metadata can never be read.
pub struct UnavailableStore;

impl Store for UnavailableStore {
    fn schemas(&self) -> StoreResult<Vec<CollectionSchema>> {
        Err(StoreError::Rejected("metadata locked".into()))
    }

    fn record_ids(&self, collection: &str) -> StoreResult<Vec<RecordId>> {
        Err(StoreError::UnknownCollection(collection.to_string()))
    }

    fn read_field(
        &self,
        collection: &str,
        _id: &RecordId,
        _field: &str,
    ) -> StoreResult<Option<Value>> {
        Err(StoreError::UnknownCollection(collection.to_string()))
    }

    fn begin_write(&mut self) -> StoreResult<()> {
        Err(StoreError::Rejected("read only".into()))
    }

    fn put_field(
        &mut self,
        _collection: &str,
        _id: &RecordId,
        _field: &str,
        _value: Value,
    ) -> StoreResult<()> {
        Err(StoreError::NoTransaction)
    }

    fn commit_write(&mut self) -> StoreResult<()> {
        Err(StoreError::NoTransaction)
    }

    fn rollback_write(&mut self) {}
}
