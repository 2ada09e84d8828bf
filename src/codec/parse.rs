//! Operator text → typed value

use super::errors::CoercionError;
use super::value::TypedValue;
use crate::schema::{FieldDescriptor, FieldKind};

/// Coerces operator text into a value of `field`'s kind.
///
/// Numeric input is trimmed first. String input is taken verbatim.
/// Relation, collection-valued and unsupported fields fail with
/// `NotEditable` without looking at the input.
pub fn parse(raw: &str, field: &FieldDescriptor) -> Result<TypedValue, CoercionError> {
    if !field.is_editable() {
        return Err(CoercionError::not_editable(
            &field.name,
            field.kind,
            field.is_collection_valued,
        ));
    }

    match field.kind {
        FieldKind::Bool => parse_bool(raw),
        FieldKind::Int => parse_int(raw),
        FieldKind::Float => parse_finite::<f32>(raw).map(TypedValue::Float),
        FieldKind::Double => parse_finite::<f64>(raw).map(TypedValue::Double),
        FieldKind::String => Ok(TypedValue::String(raw.to_string())),
        FieldKind::Relation | FieldKind::Unsupported => Err(CoercionError::not_editable(
            &field.name,
            field.kind,
            field.is_collection_valued,
        )),
    }
}

fn parse_bool(raw: &str) -> Result<TypedValue, CoercionError> {
    let token = raw.trim();
    if token.eq_ignore_ascii_case("true") || token == "1" {
        Ok(TypedValue::Bool(true))
    } else if token.eq_ignore_ascii_case("false") || token == "0" {
        Ok(TypedValue::Bool(false))
    } else {
        Err(CoercionError::InvalidBool {
            input: raw.to_string(),
        })
    }
}

fn parse_int(raw: &str) -> Result<TypedValue, CoercionError> {
    let invalid = || CoercionError::InvalidInt {
        input: raw.to_string(),
    };

    let token = raw.trim();
    if token.chars().any(char::is_alphabetic) {
        return Err(invalid());
    }
    token.parse::<i64>().map(TypedValue::Int).map_err(|_| invalid())
}

trait Finite: std::str::FromStr {
    fn is_finite_value(&self) -> bool;
}

impl Finite for f32 {
    fn is_finite_value(&self) -> bool {
        self.is_finite()
    }
}

impl Finite for f64 {
    fn is_finite_value(&self) -> bool {
        self.is_finite()
    }
}

fn parse_finite<T: Finite>(raw: &str) -> Result<T, CoercionError> {
    match raw.trim().parse::<T>() {
        Ok(value) if value.is_finite_value() => Ok(value),
        _ => Err(CoercionError::InvalidNumber {
            input: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{render, Value};
    use crate::schema::{FieldDef, FieldType};
    use proptest::prelude::*;

    fn field(def: FieldDef) -> FieldDescriptor {
        FieldDescriptor::from_def("Test", &def, |_| true)
    }

    #[test]
    fn test_parse_int() {
        let age = field(FieldDef::int("age"));
        assert_eq!(parse("42", &age), Ok(TypedValue::Int(42)));
        assert_eq!(parse(" -7 ", &age), Ok(TypedValue::Int(-7)));
        assert!(matches!(parse("abc", &age), Err(CoercionError::InvalidInt { .. })));
        assert!(matches!(parse("12a", &age), Err(CoercionError::InvalidInt { .. })));
        assert!(matches!(parse("1.5", &age), Err(CoercionError::InvalidInt { .. })));
        assert!(matches!(parse("", &age), Err(CoercionError::InvalidInt { .. })));
    }

    #[test]
    fn test_parse_int_keeps_original_input() {
        let age = field(FieldDef::int("age"));
        let err = parse("thirty", &age).unwrap_err();
        assert_eq!(
            err,
            CoercionError::InvalidInt {
                input: "thirty".into()
            }
        );
        assert_eq!(err.code(), "SCOPE_INVALID_INT");
    }

    #[test]
    fn test_parse_bool() {
        let flag = field(FieldDef::bool("active"));
        assert_eq!(parse("true", &flag), Ok(TypedValue::Bool(true)));
        assert_eq!(parse("FALSE", &flag), Ok(TypedValue::Bool(false)));
        assert_eq!(parse("1", &flag), Ok(TypedValue::Bool(true)));
        assert_eq!(parse("0", &flag), Ok(TypedValue::Bool(false)));
        assert!(matches!(parse("yes", &flag), Err(CoercionError::InvalidBool { .. })));
        assert!(matches!(parse("2", &flag), Err(CoercionError::InvalidBool { .. })));
    }

    #[test]
    fn test_parse_numbers_must_be_finite() {
        let weight = field(FieldDef::float("weight"));
        let height = field(FieldDef::double("height"));

        assert_eq!(parse("1.25", &weight), Ok(TypedValue::Float(1.25)));
        assert_eq!(parse("180", &height), Ok(TypedValue::Double(180.0)));
        assert!(matches!(parse("NaN", &height), Err(CoercionError::InvalidNumber { .. })));
        assert!(matches!(parse("inf", &height), Err(CoercionError::InvalidNumber { .. })));
        assert!(matches!(parse("1e39", &weight), Err(CoercionError::InvalidNumber { .. })));
        assert!(matches!(parse("1,5", &weight), Err(CoercionError::InvalidNumber { .. })));
    }

    #[test]
    fn test_parse_string_verbatim() {
        let name = field(FieldDef::string("name"));
        assert_eq!(parse("  Al ", &name), Ok(TypedValue::String("  Al ".into())));
        assert_eq!(parse("", &name), Ok(TypedValue::String(String::new())));
    }

    #[test]
    fn test_parse_not_editable() {
        let dogs = field(FieldDef::list("dogs", "Dog"));
        let best = field(FieldDef::link("best", "Dog"));
        let born = field(FieldDef::new("born", FieldType::Other));

        for f in [&dogs, &best, &born] {
            assert!(matches!(parse("1", f), Err(CoercionError::NotEditable { .. })));
        }
        assert_eq!(
            parse("x", &dogs).unwrap_err().to_string(),
            "list field 'dogs' cannot be edited"
        );
    }

    fn reparse(value: TypedValue, def: FieldDef) -> Result<TypedValue, CoercionError> {
        let field = field(def);
        parse(&render(&Value::from(value), &field), &field)
    }

    proptest! {
        #[test]
        fn test_int_render_parse_roundtrip(i in any::<i64>()) {
            prop_assert_eq!(reparse(TypedValue::Int(i), FieldDef::int("i")), Ok(TypedValue::Int(i)));
        }

        #[test]
        fn test_bool_render_parse_roundtrip(b in any::<bool>()) {
            prop_assert_eq!(reparse(TypedValue::Bool(b), FieldDef::bool("b")), Ok(TypedValue::Bool(b)));
        }

        #[test]
        fn test_float_render_parse_roundtrip(f in proptest::num::f32::NORMAL | proptest::num::f32::ZERO) {
            prop_assert_eq!(reparse(TypedValue::Float(f), FieldDef::float("f")), Ok(TypedValue::Float(f)));
        }

        #[test]
        fn test_double_render_parse_roundtrip(d in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
            prop_assert_eq!(reparse(TypedValue::Double(d), FieldDef::double("d")), Ok(TypedValue::Double(d)));
        }

        #[test]
        fn test_string_render_parse_roundtrip(s in ".*") {
            prop_assert_eq!(
                reparse(TypedValue::String(s.clone()), FieldDef::string("s")),
                Ok(TypedValue::String(s))
            );
        }
    }
}
