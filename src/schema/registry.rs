//! Session-scoped registry of collection and field descriptors.
//!
//! Built once from store metadata when a browsing session starts and never
//! modified afterwards, so every descriptor keeps its kind for the whole
//! session.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::errors::{SchemaError, SchemaResult};
use super::types::{CollectionDescriptor, CollectionSchema, FieldDescriptor};
use crate::observability::Event;
use crate::store::Store;

/// Collection descriptors in the store's natural schema order.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    collections: Vec<Arc<CollectionDescriptor>>,
}

impl SchemaRegistry {
    /// Reads the store's metadata and derives every descriptor.
    ///
    /// # Errors
    ///
    /// `SCOPE_SCHEMA_UNAVAILABLE` if the store cannot hand out its metadata,
    /// `SCOPE_MALFORMED_SCHEMA` if two collections share a name.
    pub fn load<S: Store + ?Sized>(store: &S) -> SchemaResult<Self> {
        let schemas = store
            .schemas()
            .map_err(|e| SchemaError::unavailable(e.to_string()))?;
        let registry = Self::from_schemas(&schemas)?;

        debug!(
            event = Event::SchemaLoaded.as_str(),
            collections = registry.collections.len(),
            "schema loaded"
        );

        Ok(registry)
    }

    /// Derives descriptors from already-read schemas, preserving their order.
    pub fn from_schemas(schemas: &[CollectionSchema]) -> SchemaResult<Self> {
        let mut names = HashSet::new();
        for schema in schemas {
            if !names.insert(schema.name.as_str()) {
                return Err(SchemaError::malformed_schema(
                    &schema.name,
                    "collection defined twice",
                ));
            }
        }

        let collections = schemas
            .iter()
            .map(|schema| {
                let field_descriptors = schema
                    .fields
                    .iter()
                    .map(|def| {
                        FieldDescriptor::from_def(&schema.name, def, |target| {
                            names.contains(target)
                        })
                    })
                    .collect();

                Arc::new(CollectionDescriptor {
                    name: schema.name.clone(),
                    field_descriptors,
                })
            })
            .collect();

        Ok(Self { collections })
    }

    /// Every collection, in schema order.
    pub fn list_collections(&self) -> &[Arc<CollectionDescriptor>] {
        &self.collections
    }

    /// Fields of `collection` in declaration order.
    pub fn fields_for<'a>(&self, collection: &'a CollectionDescriptor) -> &'a [FieldDescriptor] {
        &collection.field_descriptors
    }

    /// Looks up a collection by name.
    pub fn collection(&self, name: &str) -> Option<&Arc<CollectionDescriptor>> {
        self.collections.iter().find(|c| c.name == name)
    }
}
