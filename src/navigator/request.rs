//! Edit requests

use super::errors::NavigatorError;
use crate::records::Record;
use crate::schema::FieldDescriptor;

/// One pending edit: operator text for one field of one record.
///
/// Can only be built for a field of the record's own collection, so a
/// foreign field never reaches the record store.
#[derive(Debug, Clone)]
pub struct EditRequest {
    record: Record,
    field: FieldDescriptor,
    raw_input: String,
}

impl EditRequest {
    pub fn new(
        record: Record,
        field: FieldDescriptor,
        raw_input: impl Into<String>,
    ) -> Result<Self, NavigatorError> {
        if !record.collection.owns(&field) {
            return Err(NavigatorError::ForeignField {
                field: field.name,
                collection: record.collection.name.clone(),
            });
        }

        Ok(Self {
            record,
            field,
            raw_input: raw_input.into(),
        })
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn field(&self) -> &FieldDescriptor {
        &self.field
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    /// Consumes the request.
    pub fn into_parts(self) -> (Record, FieldDescriptor, String) {
        (self.record, self.field, self.raw_input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CollectionDescriptor, FieldDef};
    use std::sync::Arc;

    fn person() -> Arc<CollectionDescriptor> {
        Arc::new(CollectionDescriptor {
            name: "Person".into(),
            field_descriptors: vec![FieldDescriptor::from_def("Person", &FieldDef::int("age"), |_| true)],
        })
    }

    #[test]
    fn test_own_field_accepted() {
        let collection = person();
        let field = collection.field_descriptors[0].clone();
        let request = EditRequest::new(Record::new("p1".into(), collection), field, "31").unwrap();
        assert_eq!(request.raw_input(), "31");
        assert_eq!(request.field().name, "age");
    }

    #[test]
    fn test_foreign_field_rejected() {
        // Same name and kind as Person.age, declared by another collection.
        let field = FieldDescriptor::from_def("Dog", &FieldDef::int("age"), |_| true);
        let err = EditRequest::new(Record::new("p1".into(), person()), field, "3").unwrap_err();
        assert!(matches!(err, NavigatorError::ForeignField { .. }));
    }
}
