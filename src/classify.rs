//! Value categories and leaf conversion.
pub mod isoformat;

use crate::error::DumpErrorKind;
use crate::registry::RecordTypeRegistry;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Null,
    Boolean,
    String,
    Integer,
    Float,
    DateTime,
    UniqueId,
    Decimal,
    Record,
    List,
    Unsupported,
}

/// A converted primitive, ready to be emitted by either dumper.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Assigns `value` to its category. The arms are in precedence order: the
/// absence marker first, then date/time, identifier and decimal values, then
/// booleans strictly ahead of integers.
pub fn classify(value: &Value, registry: &RecordTypeRegistry) -> Category {
    match value {
        Value::None => Category::Null,
        Value::Date(_) | Value::DateTime(_) | Value::DateTimeTz(_) => Category::DateTime,
        Value::Uuid(_) => Category::UniqueId,
        Value::Decimal(_) => Category::Decimal,
        Value::Bool(_) => Category::Boolean,
        Value::Str(_) => Category::String,
        Value::Int(_) => Category::Integer,
        Value::Float(_) => Category::Float,
        Value::Object(obj) if registry.is_record_object(obj.as_ref()) => Category::Record,
        Value::List(_) => Category::List,
        Value::Object(_) => Category::Unsupported,
    }
}

/// Converts a primitive-category value. Records, lists and unsupported
/// values are not leaves and are rejected.
pub fn convert(value: &Value) -> Result<Leaf, DumpErrorKind> {
    Ok(match value {
        Value::Date(d) => Leaf::Str(isoformat::date(d)),
        Value::DateTime(dt) => Leaf::Str(isoformat::datetime(dt)),
        Value::DateTimeTz(dt) => Leaf::Str(isoformat::datetime_tz(dt)),
        Value::Uuid(id) => Leaf::Str(id.hyphenated().to_string()),
        Value::Decimal(d) => {
            if d.is_nan() {
                return Err(DumpErrorKind::InvalidNumeric { value: d.to_string() });
            }
            Leaf::Str(d.to_string())
        }
        Value::Bool(b) => Leaf::Bool(*b),
        Value::Str(s) => Leaf::Str(s.clone()),
        Value::Int(i) => Leaf::Int(*i),
        Value::Float(f) => Leaf::Float(*f),
        Value::None | Value::List(_) | Value::Object(_) => {
            return Err(DumpErrorKind::UnsupportedType { type_name: value.type_name().to_string() });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{DecimalValue, IntoValue, Object};
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[derive(Clone)]
    struct Unit {
        n: i64,
    }
    crate::record!(Unit { n });

    struct Handle;

    impl Object for Handle {
        fn get_attr(&self, _name: &str) -> Option<Value> { None }
    }

    #[test]
    fn categories() {
        let r = RecordTypeRegistry::new();
        let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(classify(&Value::None, &r), Category::Null);
        assert_eq!(classify(&Value::Date(date), &r), Category::DateTime);
        assert_eq!(classify(&Value::Uuid(Uuid::nil()), &r), Category::UniqueId);
        assert_eq!(classify(&Value::Decimal(DecimalValue::NaN), &r), Category::Decimal);
        assert_eq!(classify(&Value::Bool(true), &r), Category::Boolean);
        assert_eq!(classify(&Value::Str("x".into()), &r), Category::String);
        assert_eq!(classify(&Value::Int(1), &r), Category::Integer);
        assert_eq!(classify(&Value::Float(1.5), &r), Category::Float);
        assert_eq!(classify(&Unit { n: 1 }.into_value(), &r), Category::Record);
        assert_eq!(classify(&Value::List(vec![]), &r), Category::List);
        assert_eq!(classify(&Value::object(Handle), &r), Category::Unsupported);
    }

    #[test]
    fn booleans_stay_booleans() {
        assert_eq!(convert(&Value::Bool(true)).unwrap(), Leaf::Bool(true));
        assert_eq!(convert(&Value::Int(1)).unwrap(), Leaf::Int(1));
    }

    #[test]
    fn decimals_convert_to_exact_strings() {
        let d: DecimalValue = "3.14".parse().unwrap();
        assert_eq!(convert(&Value::Decimal(d)).unwrap(), Leaf::Str("3.14".into()));
        assert_eq!(
            convert(&Value::Decimal(DecimalValue::NaN)),
            Err(DumpErrorKind::InvalidNumeric { value: "NaN".into() })
        );
    }

    #[test]
    fn uuids_are_hyphenated_lowercase() {
        let id = Uuid::from_u128(0xA1A2A3A4_B1B2_C1C2_D1D2_D3D4D5D6D7D8);
        assert_eq!(
            convert(&Value::Uuid(id)).unwrap(),
            Leaf::Str("a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8".into())
        );
    }

    #[test]
    fn non_leaves_are_rejected() {
        assert!(matches!(
            convert(&Value::List(vec![])),
            Err(DumpErrorKind::UnsupportedType { .. })
        ));
    }
}
