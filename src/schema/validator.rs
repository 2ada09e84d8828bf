//! Document validation for inserts
//!
//! Validation semantics:
//! - No undeclared fields exist
//! - Declared fields may be absent or null
//! - Present values match the declared type exactly (no coercion)
//! - `link` holds a record id string, `list` an array of record id strings
//! - Fields of unknown type accept any value

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{CollectionSchema, FieldType};

/// Validates documents against a collection schema. Never mutates documents.
pub struct SchemaValidator<'a> {
    schema: &'a CollectionSchema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a CollectionSchema) -> Self {
        Self { schema }
    }

    /// Validates a full document.
    pub fn validate_document(&self, document: &Map<String, Value>) -> SchemaResult<()> {
        for key in document.keys() {
            if self.schema.field(key).is_none() {
                return Err(SchemaError::document_invalid(
                    &self.schema.name,
                    key,
                    "undeclared field",
                ));
            }
        }

        for def in &self.schema.fields {
            if let Some(value) = document.get(&def.name) {
                self.validate_value(&def.name, &def.field_type, value)?;
            }
        }

        Ok(())
    }

    /// Validates a single field value.
    pub fn validate_value(
        &self,
        field: &str,
        expected: &FieldType,
        value: &Value,
    ) -> SchemaResult<()> {
        if value.is_null() {
            return Ok(());
        }

        let matches = match expected {
            FieldType::Bool => value.is_boolean(),
            FieldType::Int => value.is_i64(),
            FieldType::Float | FieldType::Double => value.is_number(),
            FieldType::String | FieldType::Link { .. } => value.is_string(),
            FieldType::List { .. } => value
                .as_array()
                .map_or(false, |items| items.iter().all(Value::is_string)),
            FieldType::Other => true,
        };

        if matches {
            Ok(())
        } else {
            Err(SchemaError::document_invalid(
                &self.schema.name,
                field,
                format!(
                    "expected {}, got {}",
                    expected.type_name(),
                    json_type_name(value)
                ),
            ))
        }
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;
    use serde_json::json;

    fn person() -> CollectionSchema {
        CollectionSchema::new(
            "Person",
            vec![
                FieldDef::string("name"),
                FieldDef::int("age"),
                FieldDef::bool("active"),
                FieldDef::double("height"),
                FieldDef::list("dogs", "Dog"),
            ],
        )
    }

    fn doc(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_document_passes() {
        let schema = person();
        let validator = SchemaValidator::new(&schema);

        let document = doc(json!({
            "name": "Alice",
            "age": 30,
            "active": true,
            "height": 1.7,
            "dogs": ["d1", "d2"]
        }));

        assert!(validator.validate_document(&document).is_ok());
    }

    #[test]
    fn test_missing_and_null_fields_allowed() {
        let schema = person();
        let validator = SchemaValidator::new(&schema);

        let document = doc(json!({"name": null}));
        assert!(validator.validate_document(&document).is_ok());
    }

    #[test]
    fn test_undeclared_field_rejected() {
        let schema = person();
        let validator = SchemaValidator::new(&schema);

        let err = validator
            .validate_document(&doc(json!({"nickname": "Al"})))
            .unwrap_err();
        assert!(err.message().contains("undeclared"));
    }

    #[test]
    fn test_int_rejects_float() {
        let schema = person();
        let validator = SchemaValidator::new(&schema);

        let err = validator
            .validate_document(&doc(json!({"age": 30.5})))
            .unwrap_err();
        assert!(err.message().contains("expected int, got float"));
    }

    #[test]
    fn test_list_requires_string_ids() {
        let schema = person();
        let validator = SchemaValidator::new(&schema);

        assert!(validator
            .validate_document(&doc(json!({"dogs": [1, 2]})))
            .is_err());
    }
}
