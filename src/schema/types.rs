//! Schema type definitions
//!
//! Two layers live here:
//! - The stored metadata (`CollectionSchema`, `FieldDef`, `FieldType`), exactly
//!   as a store persists it.
//! - The browsing descriptors (`CollectionDescriptor`, `FieldDescriptor`,
//!   `FieldKind`), derived once per session from the stored metadata.
//!
//! Stored field types:
//! - bool, int, float, double, string: editable scalars
//! - link: reference to a single record of `target`
//! - list: zero-or-more references to records of `target`
//! - anything else: kept for visibility, never editable

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Field type as declared in store metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    Bool,
    /// 64-bit signed integer
    Int,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    /// UTF-8 string
    String,
    /// Reference to one record of the target collection
    Link { target: String },
    /// References to zero or more records of the target collection
    List { target: String },
    /// Any type this browser does not understand (dates, blobs, ...)
    #[serde(other)]
    Other,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::String => "string",
            FieldType::Link { .. } => "link",
            FieldType::List { .. } => "list",
            FieldType::Other => "other",
        }
    }
}

/// A single field declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(flatten)]
    pub field_type: FieldType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Bool)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub fn double(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Double)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn link(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldType::Link {
                target: target.into(),
            },
        )
    }

    pub fn list(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldType::List {
                target: target.into(),
            },
        )
    }
}

/// Stored schema of one collection. Field order is declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl CollectionSchema {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Looks up a field declaration by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates the schema structure itself (not a document).
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Collection name must not be empty".into());
        }
        if self.name.contains([':', '/', '\\']) {
            return Err(format!(
                "Collection name '{}' must not contain ':' or path separators",
                self.name
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err("Field name must not be empty".into());
            }
            if !seen.insert(field.name.as_str()) {
                return Err(format!("Duplicate field '{}'", field.name));
            }
        }

        Ok(())
    }
}

/// Browsing kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    Double,
    String,
    Relation,
    Unsupported,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Double => "double",
            FieldKind::String => "string",
            FieldKind::Relation => "relation",
            FieldKind::Unsupported => "unsupported",
        }
    }
}

/// Field as seen by the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Name of the collection that declares this field
    pub collection: String,
    pub kind: FieldKind,
    pub is_collection_valued: bool,
    /// Linked collection for relation fields
    pub target: Option<String>,
}

impl FieldDescriptor {
    /// Derives a descriptor for a field declared by `collection`.
    ///
    /// `collection_exists` decides whether a relation target is known; a
    /// relation to an unknown collection is reported as `Unsupported`.
    pub fn from_def(
        collection: &str,
        def: &FieldDef,
        collection_exists: impl Fn(&str) -> bool,
    ) -> Self {
        let (kind, is_collection_valued, target) = match &def.field_type {
            FieldType::Bool => (FieldKind::Bool, false, None),
            FieldType::Int => (FieldKind::Int, false, None),
            FieldType::Float => (FieldKind::Float, false, None),
            FieldType::Double => (FieldKind::Double, false, None),
            FieldType::String => (FieldKind::String, false, None),
            FieldType::Link { target } if collection_exists(target) => {
                (FieldKind::Relation, false, Some(target.clone()))
            }
            FieldType::List { target } if collection_exists(target) => {
                (FieldKind::Relation, true, Some(target.clone()))
            }
            FieldType::Link { .. } | FieldType::List { .. } | FieldType::Other => {
                (FieldKind::Unsupported, false, None)
            }
        };

        Self {
            name: def.name.clone(),
            collection: collection.to_string(),
            kind,
            is_collection_valued,
            target,
        }
    }

    /// Whether operator text may be written into this field.
    pub fn is_editable(&self) -> bool {
        !self.is_collection_valued
            && matches!(
                self.kind,
                FieldKind::Bool
                    | FieldKind::Int
                    | FieldKind::Float
                    | FieldKind::Double
                    | FieldKind::String
            )
    }
}

/// Collection as seen by the browser. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDescriptor {
    pub name: String,
    pub field_descriptors: Vec<FieldDescriptor>,
}

impl CollectionDescriptor {
    /// Looks up a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field_descriptors.iter().find(|f| f.name == name)
    }

    /// Whether `field` is one of this collection's own fields.
    pub fn owns(&self, field: &FieldDescriptor) -> bool {
        field.collection == self.name && self.field(&field.name) == Some(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(name: &str) -> bool {
        name == "Dog"
    }

    #[test]
    fn test_field_kinds_from_defs() {
        let cases = [
            (FieldDef::bool("b"), FieldKind::Bool),
            (FieldDef::int("i"), FieldKind::Int),
            (FieldDef::float("f"), FieldKind::Float),
            (FieldDef::double("d"), FieldKind::Double),
            (FieldDef::string("s"), FieldKind::String),
            (FieldDef::link("l", "Dog"), FieldKind::Relation),
            (FieldDef::new("x", FieldType::Other), FieldKind::Unsupported),
        ];

        for (def, kind) in cases {
            assert_eq!(FieldDescriptor::from_def("Person", &def, known).kind, kind);
        }
    }

    #[test]
    fn test_list_is_collection_valued() {
        let desc = FieldDescriptor::from_def("Person", &FieldDef::list("dogs", "Dog"), known);
        assert_eq!(desc.kind, FieldKind::Relation);
        assert!(desc.is_collection_valued);
        assert_eq!(desc.target.as_deref(), Some("Dog"));
        assert!(!desc.is_editable());
    }

    #[test]
    fn test_relation_to_unknown_collection_is_unsupported() {
        let desc = FieldDescriptor::from_def("Person", &FieldDef::list("cats", "Cat"), known);
        assert_eq!(desc.kind, FieldKind::Unsupported);
        assert!(!desc.is_collection_valued);
        assert!(desc.target.is_none());
    }

    #[test]
    fn test_unknown_type_deserializes_as_other() {
        let def: FieldDef =
            serde_json::from_str(r#"{"name": "born", "type": "date"}"#).unwrap();
        assert_eq!(def.field_type, FieldType::Other);
        assert_eq!(def.name, "born");
    }

    #[test]
    fn test_schema_json_shape() {
        let json = r#"{
            "name": "Person",
            "fields": [
                {"name": "name", "type": "string"},
                {"name": "dogs", "type": "list", "target": "Dog"}
            ]
        }"#;
        let schema: CollectionSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.fields[0], FieldDef::string("name"));
        assert_eq!(schema.fields[1], FieldDef::list("dogs", "Dog"));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let schema = CollectionSchema::new(
            "Person",
            vec![FieldDef::string("name"), FieldDef::int("name")],
        );
        let result = schema.validate_structure();
        assert!(result.unwrap_err().contains("Duplicate"));
    }

    #[test]
    fn test_owns_checks_descriptor_identity() {
        let person = CollectionDescriptor {
            name: "Person".into(),
            field_descriptors: vec![FieldDescriptor::from_def(
                "Person",
                &FieldDef::int("age"),
                known,
            )],
        };
        let retyped = FieldDescriptor::from_def("Person", &FieldDef::string("age"), known);

        assert!(person.owns(&person.field_descriptors[0]));
        assert!(!person.owns(&retyped));
    }

    #[test]
    fn test_same_named_field_of_other_collection_not_owned() {
        let person = CollectionDescriptor {
            name: "Person".into(),
            field_descriptors: vec![FieldDescriptor::from_def(
                "Person",
                &FieldDef::string("name"),
                known,
            )],
        };
        let dog_name = FieldDescriptor::from_def("Dog", &FieldDef::string("name"), known);

        assert_eq!(dog_name.kind, person.field_descriptors[0].kind);
        assert!(!person.owns(&dog_name));
    }
}
