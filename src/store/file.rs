//! File-backed store.
//!
//! Layout under the data directory:
//!
//! ```text
//! <data_dir>/metadata/schemas/<collection>.json
//! <data_dir>/data/records.dat
//! ```
//!
//! Reads open a fresh reader on the record file every time, so they always
//! see the latest committed entries. A commit appends the staged documents
//! as one synced batch.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use super::{apply_field, Document, RecordId, Store, StoreError, StoreResult};
use crate::observability::Event;
use crate::schema::{CollectionSchema, SchemaLoader, SchemaValidator};
use crate::storage::{entry_key, RecordEntry, StorageReader, StorageWriter};

pub struct FileStore {
    data_dir: PathBuf,
    loader: SchemaLoader,
    writer: StorageWriter,
    staged: Option<Vec<(String, RecordId, Document)>>,
}

impl FileStore {
    /// Opens (creating if needed) the store rooted at `data_dir`.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        let mut loader = SchemaLoader::new(data_dir);
        loader.load_all()?;
        let writer = StorageWriter::open(data_dir)?;

        info!(
            event = Event::StoreOpened.as_str(),
            data_dir = %data_dir.display(),
            collections = loader.schema_count(),
            records = writer.keys().len(),
            "store opened"
        );

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            loader,
            writer,
            staged: None,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Defines a new collection and persists its schema file.
    pub fn define_collection(&mut self, schema: CollectionSchema) -> StoreResult<()> {
        self.loader.save_schema(schema)?;
        Ok(())
    }

    /// Validates and durably inserts a document under a fresh id.
    pub fn insert(&mut self, collection: &str, document: Document) -> StoreResult<RecordId> {
        let id = RecordId::generate();
        self.insert_with_id(collection, id.clone(), document)?;
        Ok(id)
    }

    /// Validates and durably writes a document under a caller-chosen id.
    pub fn insert_with_id(
        &mut self,
        collection: &str,
        id: RecordId,
        document: Document,
    ) -> StoreResult<()> {
        if self.staged.is_some() {
            return Err(StoreError::TransactionOpen);
        }

        SchemaValidator::new(self.schema(collection)?).validate_document(&document)?;
        self.writer
            .append_batch(&[encode_entry(collection, &id, &document)])?;
        Ok(())
    }

    fn schema(&self, collection: &str) -> StoreResult<&CollectionSchema> {
        self.loader
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
    }

    fn read_document(&self, collection: &str, id: &RecordId) -> StoreResult<Document> {
        let key = entry_key(collection, id.as_str());
        let offset = self
            .writer
            .offset_of(&key)
            .ok_or_else(|| StoreError::RecordNotFound {
                collection: collection.to_string(),
                record_id: id.to_string(),
            })?;

        let entry = StorageReader::open(self.writer.path())?.read_at(offset)?;

        match serde_json::from_slice::<Value>(&entry.body) {
            Ok(Value::Object(document)) => Ok(document),
            _ => Err(StoreError::CorruptDocument(key)),
        }
    }
}

fn encode_entry(collection: &str, id: &RecordId, document: &Document) -> RecordEntry {
    // A Map<String, Value> always serializes.
    let body = serde_json::to_vec(document).unwrap_or_default();
    RecordEntry::new(collection, id.as_str(), body)
}

impl Store for FileStore {
    fn schemas(&self) -> StoreResult<Vec<CollectionSchema>> {
        Ok(self.loader.all_schemas().cloned().collect())
    }

    fn record_ids(&self, collection: &str) -> StoreResult<Vec<RecordId>> {
        self.schema(collection)?;
        let prefix = format!("{}:", collection);

        Ok(self
            .writer
            .keys()
            .iter()
            .filter_map(|key| key.strip_prefix(&prefix))
            .map(RecordId::from)
            .collect())
    }

    fn read_field(
        &self,
        collection: &str,
        id: &RecordId,
        field: &str,
    ) -> StoreResult<Option<Value>> {
        Ok(self.read_document(collection, id)?.remove(field))
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
            None => self.read_document(collection, id)?,
        };
        apply_field(self.schema(collection)?, &mut document, field, value)?;

        let staged = self.staged.as_mut().ok_or(StoreError::NoTransaction)?;
        staged.retain(|(c, existing, _)| !(c == collection && existing == id));
        staged.push((collection.to_string(), id.clone(), document));
        Ok(())
    }

    fn commit_write(&mut self) -> StoreResult<()> {
        let staged = self.staged.take().ok_or(StoreError::NoTransaction)?;
        if staged.is_empty() {
            return Ok(());
        }

        let entries: Vec<RecordEntry> = staged
            .iter()
            .map(|(collection, id, document)| encode_entry(collection, id, document))
            .collect();

        self.writer.append_batch(&entries)?;
        Ok(())
    }

    fn rollback_write(&mut self) {
        if let Some(staged) = self.staged.take() {
            if !staged.is_empty() {
                warn!(
                    event = Event::WriteRolledBack.as_str(),
                    staged = staged.len(),
                    "discarded staged documents"
                );
            }
        }
    }
}
