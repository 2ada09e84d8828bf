//! Schema loader for the file-backed store
//!
//! - Schemas stored at metadata/schemas/<collection>.json
//! - One file per collection
//! - Malformed schema files fail the load

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};
use super::types::CollectionSchema;

/// Reads schema files from disk and keeps them in name order.
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Loaded schemas indexed by collection name
    schemas: BTreeMap<String, CollectionSchema>,
}

impl SchemaLoader {
    /// Creates a new schema loader for the given data directory.
    ///
    /// Schema files are expected at `<data_dir>/metadata/schemas/`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            schema_dir: data_dir.join("metadata").join("schemas"),
            schemas: BTreeMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads all schema files from the schema directory.
    ///
    /// A missing directory means an empty store; an unreadable one means the
    /// store metadata is unavailable.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        if !self.schema_dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::unavailable(format!(
                "failed to read schema directory {}: {}",
                self.schema_dir.display(),
                e
            ))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::unavailable(format!("failed to read directory entry: {}", e))
            })?;

            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            self.load_schema_file(&path)?;
        }

        Ok(())
    }

    /// Loads a single schema file.
    fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::unavailable(format!("failed to read {}: {}", path.display(), e))
        })?;

        let schema: CollectionSchema = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(path.display().to_string(), e))?;

        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::malformed_schema(
                path.display().to_string(),
                format!("collection '{}' defined twice", schema.name),
            ));
        }

        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Gets a schema by collection name.
    pub fn get(&self, name: &str) -> Option<&CollectionSchema> {
        self.schemas.get(name)
    }

    /// All loaded schemas, ordered by collection name.
    pub fn all_schemas(&self) -> impl Iterator<Item = &CollectionSchema> {
        self.schemas.values()
    }

    /// Returns the number of loaded schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Registers a schema and writes it to disk.
    pub fn save_schema(&mut self, schema: CollectionSchema) -> SchemaResult<PathBuf> {
        let path = self.schema_dir.join(format!("{}.json", schema.name));

        if path.exists() || self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::schema_exists(&schema.name));
        }

        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(path.display().to_string(), e))?;

        fs::create_dir_all(&self.schema_dir).map_err(|e| {
            SchemaError::unavailable(format!(
                "failed to create schema directory {}: {}",
                self.schema_dir.display(),
                e
            ))
        })?;

        let content = serde_json::to_string_pretty(&schema).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to serialize schema: {}", e),
            )
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::unavailable(format!("failed to write {}: {}", path.display(), e))
        })?;

        self.schemas.insert(schema.name.clone(), schema);
        Ok(path)
    }
}
