//! Field values as the codec sees them.

use serde_json::{Number, Value as Json};

use crate::schema::{FieldDescriptor, FieldKind};
use crate::store::RecordId;

/// Current value of a field, decoded for the field's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Linked record ids of a relation field
    Links(Vec<RecordId>),
    /// Field is unset
    Null,
    /// Stored data that does not fit the field's kind
    Opaque(Json),
}

/// A value that can be written into an editable field.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl TypedValue {
    /// Kind this value can be written to.
    pub fn kind(&self) -> FieldKind {
        match self {
            TypedValue::Bool(_) => FieldKind::Bool,
            TypedValue::Int(_) => FieldKind::Int,
            TypedValue::Float(_) => FieldKind::Float,
            TypedValue::Double(_) => FieldKind::Double,
            TypedValue::String(_) => FieldKind::String,
        }
    }
}

impl From<TypedValue> for Value {
    fn from(value: TypedValue) -> Self {
        match value {
            TypedValue::Bool(b) => Value::Bool(b),
            TypedValue::Int(i) => Value::Int(i),
            TypedValue::Float(f) => Value::Float(f),
            TypedValue::Double(d) => Value::Double(d),
            TypedValue::String(s) => Value::String(s),
        }
    }
}

/// Decodes a stored JSON value for `field`. Never fails: data that does not
/// match the field's kind comes back as `Opaque`.
pub fn decode(json: Option<Json>, field: &FieldDescriptor) -> Value {
    let json = match json {
        None | Some(Json::Null) => return Value::Null,
        Some(json) => json,
    };

    let decoded = match (field.kind, &json) {
        (FieldKind::Bool, Json::Bool(b)) => Some(Value::Bool(*b)),
        (FieldKind::Int, Json::Number(n)) => n.as_i64().map(Value::Int),
        // A stored number outside f32 range stays opaque instead of turning
        // into an infinity that parse would refuse.
        (FieldKind::Float, Json::Number(n)) => n
            .as_f64()
            .map(|f| f as f32)
            .filter(|f| f.is_finite())
            .map(Value::Float),
        (FieldKind::Double, Json::Number(n)) => n.as_f64().map(Value::Double),
        (FieldKind::String, Json::String(s)) => Some(Value::String(s.clone())),
        (FieldKind::Relation, Json::String(id)) if !field.is_collection_valued => {
            Some(Value::Links(vec![RecordId::new(id.as_str())]))
        }
        (FieldKind::Relation, Json::Array(items)) if field.is_collection_valued => items
            .iter()
            .map(|item| item.as_str().map(RecordId::from))
            .collect::<Option<Vec<_>>>()
            .map(Value::Links),
        _ => None,
    };

    decoded.unwrap_or(Value::Opaque(json))
}

/// Encodes a typed value for storage.
pub fn encode(value: &TypedValue) -> Json {
    match value {
        TypedValue::Bool(b) => Json::Bool(*b),
        TypedValue::Int(i) => Json::from(*i),
        TypedValue::Float(f) => Number::from_f64(f64::from(*f)).map_or(Json::Null, Json::Number),
        TypedValue::Double(d) => Number::from_f64(*d).map_or(Json::Null, Json::Number),
        TypedValue::String(s) => Json::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;
    use serde_json::json;

    fn field(def: FieldDef) -> FieldDescriptor {
        FieldDescriptor::from_def("Test", &def, |_| true)
    }

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode(Some(json!(true)), &field(FieldDef::bool("b"))), Value::Bool(true));
        assert_eq!(decode(Some(json!(30)), &field(FieldDef::int("i"))), Value::Int(30));
        assert_eq!(decode(Some(json!(1.5)), &field(FieldDef::float("f"))), Value::Float(1.5));
        assert_eq!(decode(Some(json!(2)), &field(FieldDef::double("d"))), Value::Double(2.0));
        assert_eq!(
            decode(Some(json!("Alice")), &field(FieldDef::string("s"))),
            Value::String("Alice".into())
        );
    }

    #[test]
    fn test_decode_missing_is_null() {
        assert_eq!(decode(None, &field(FieldDef::int("i"))), Value::Null);
        assert_eq!(decode(Some(json!(null)), &field(FieldDef::int("i"))), Value::Null);
    }

    #[test]
    fn test_decode_mismatch_is_opaque() {
        let value = decode(Some(json!("thirty")), &field(FieldDef::int("age")));
        assert_eq!(value, Value::Opaque(json!("thirty")));
    }

    #[test]
    fn test_decode_float_out_of_range_is_opaque() {
        let ratio = field(FieldDef::float("f"));
        let value = decode(Some(json!(1e300)), &ratio);
        assert_eq!(value, Value::Opaque(json!(1e300)));

        let shown = crate::codec::render(&value, &ratio);
        assert_eq!(shown, "1e300");
        assert_eq!(decode(Some(json!(-1e39)), &ratio), Value::Opaque(json!(-1e39)));
        assert_eq!(decode(Some(json!(3.0e38)), &ratio), Value::Float(3.0e38));
    }

    #[test]
    fn test_decode_relations() {
        let list = decode(Some(json!(["d1", "d2"])), &field(FieldDef::list("dogs", "Dog")));
        assert_eq!(list, Value::Links(vec!["d1".into(), "d2".into()]));

        let link = decode(Some(json!("d1")), &field(FieldDef::link("best", "Dog")));
        assert_eq!(link, Value::Links(vec!["d1".into()]));
    }

    #[test]
    fn test_encode_float_as_number() {
        assert_eq!(encode(&TypedValue::Float(0.5)), json!(0.5));
        assert_eq!(encode(&TypedValue::Int(-4)), json!(-4));
    }
}
