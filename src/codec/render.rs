//! Value → display string

use super::value::Value;
use crate::schema::{FieldDescriptor, FieldKind};

/// Renders a field value for display.
///
/// Relation and unsupported fields render as an empty string; the navigator
/// builds their summary from [`count`]. An unset field also renders empty.
pub fn render(value: &Value, field: &FieldDescriptor) -> String {
    if field.is_collection_valued {
        return String::new();
    }

    match field.kind {
        FieldKind::Relation | FieldKind::Unsupported => String::new(),
        FieldKind::Bool | FieldKind::Int | FieldKind::Float | FieldKind::Double | FieldKind::String => {
            render_scalar(value)
        }
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        // Display for floats is the shortest string that parses back to the
        // same value, so render and parse agree.
        Value::Float(f) => f.to_string(),
        Value::Double(d) => d.to_string(),
        Value::String(s) => s.clone(),
        Value::Opaque(json) => json.to_string(),
        Value::Links(_) | Value::Null => String::new(),
    }
}

/// Number of linked records held by a relation value.
pub fn count(value: &Value) -> Option<usize> {
    match value {
        Value::Links(ids) => Some(ids.len()),
        Value::Null => Some(0),
        _ => None,
    }
}
