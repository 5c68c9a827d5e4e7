//! Runtime value model.
//!
//! Records are opaque objects that expose named attributes; every attribute
//! read produces a [`Value`]. The dumpers only ever look at values through
//! this enum and the [`Object`] trait.
pub mod decimal;

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

pub use decimal::DecimalValue;

// ------------------------------- Values ----------------------------------- //

#[derive(Clone)]
pub enum Value {
    /// The absence marker.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    DateTimeTz(DateTime<FixedOffset>),
    Uuid(Uuid),
    Decimal(DecimalValue),
    List(Vec<Value>),
    Object(Arc<dyn Object>),
}

impl Value {
    pub fn object<T: Object>(obj: T) -> Self {
        Value::Object(Arc::new(obj))
    }

    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoValue,
    {
        Value::List(items.into_iter().map(IntoValue::into_value).collect())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Short human name of the runtime type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Date(_) => "date",
            Value::DateTime(_) | Value::DateTimeTz(_) => "datetime",
            Value::Uuid(_) => "uuid",
            Value::Decimal(_) => "decimal",
            Value::List(_) => "list",
            Value::Object(obj) => obj.type_name(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(x) => f.debug_tuple("Bool").field(x).finish(),
            Value::Int(x) => f.debug_tuple("Int").field(x).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(x) => f.debug_tuple("Str").field(x).finish(),
            Value::Date(x) => f.debug_tuple("Date").field(x).finish(),
            Value::DateTime(x) => f.debug_tuple("DateTime").field(x).finish(),
            Value::DateTimeTz(x) => f.debug_tuple("DateTimeTz").field(x).finish(),
            Value::Uuid(x) => f.debug_tuple("Uuid").field(x).finish(),
            Value::Decimal(x) => f.debug_tuple("Decimal").field(x).finish(),
            Value::List(xs) => f.debug_tuple("List").field(xs).finish(),
            Value::Object(obj) => write!(f, "Object({})", obj.type_name()),
        }
    }
}

// ------------------------------ Objects ----------------------------------- //

/// An attribute-bearing runtime object.
///
/// Only objects whose [`Object::record_type`] answers `Some` are records; any
/// other object is opaque to the dumpers.
pub trait Object: Any + Send + Sync {
    /// Reads one attribute. `None` means the attribute does not exist, which
    /// is different from an attribute holding [`Value::None`].
    fn get_attr(&self, name: &str) -> Option<Value>;

    /// Structural record check. Relatively costly callers should go through
    /// [`crate::RecordTypeRegistry`], which memoizes the answer per type.
    fn record_type(&self) -> Option<&'static RecordType> {
        None
    }

    fn type_key(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Static layout of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordType {
    name: &'static str,
    fields: &'static [&'static str],
}

impl RecordType {
    pub const fn new(name: &'static str, fields: &'static [&'static str]) -> Self {
        Self { name, fields }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| *f == name)
    }
}

/// A record type known at compile time. Usually implemented through
/// [`record!`](crate::record).
pub trait Record: Object + Sized {
    const RECORD_TYPE: &'static RecordType;
}

/// Implements [`Record`], [`Object`] and [`IntoValue`] for a plain struct.
///
/// Every listed field must be `Clone + IntoValue`.
///
/// ```
/// use record_dump::record;
///
/// #[derive(Clone)]
/// struct Point { x: i64, y: i64 }
/// record!(Point { x, y });
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::Record for $ty {
            const RECORD_TYPE: &'static $crate::RecordType =
                &$crate::RecordType::new(stringify!($ty), &[$(stringify!($field)),*]);
        }

        impl $crate::Object for $ty {
            fn get_attr(&self, name: &str) -> ::std::option::Option<$crate::Value> {
                match name {
                    $(stringify!($field) => ::std::option::Option::Some(
                        $crate::IntoValue::into_value(::std::clone::Clone::clone(&self.$field))
                    ),)*
                    _ => ::std::option::Option::None,
                }
            }

            fn record_type(&self) -> ::std::option::Option<&'static $crate::RecordType> {
                ::std::option::Option::Some(<$ty as $crate::Record>::RECORD_TYPE)
            }
        }

        impl $crate::IntoValue for $ty {
            fn into_value(self) -> $crate::Value {
                $crate::Value::Object(::std::sync::Arc::new(self))
            }
        }
    };
}

// ---------------------------- Conversions --------------------------------- //

pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value { self }
}

impl IntoValue for bool {
    fn into_value(self) -> Value { Value::Bool(self) }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value { Value::Int(self) }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value { Value::Int(self as i64) }
}

impl IntoValue for u32 {
    fn into_value(self) -> Value { Value::Int(self as i64) }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value { Value::Float(self) }
}

impl IntoValue for String {
    fn into_value(self) -> Value { Value::Str(self) }
}

impl IntoValue for &str {
    fn into_value(self) -> Value { Value::Str(self.to_owned()) }
}

impl IntoValue for NaiveDate {
    fn into_value(self) -> Value { Value::Date(self) }
}

impl IntoValue for NaiveDateTime {
    fn into_value(self) -> Value { Value::DateTime(self) }
}

impl IntoValue for DateTime<FixedOffset> {
    fn into_value(self) -> Value { Value::DateTimeTz(self) }
}

impl IntoValue for DateTime<Utc> {
    fn into_value(self) -> Value { Value::DateTimeTz(self.fixed_offset()) }
}

impl IntoValue for Uuid {
    fn into_value(self) -> Value { Value::Uuid(self) }
}

impl IntoValue for DecimalValue {
    fn into_value(self) -> Value { Value::Decimal(self) }
}

impl IntoValue for rust_decimal::Decimal {
    fn into_value(self) -> Value { Value::Decimal(DecimalValue::Finite(self)) }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(x) => x.into_value(),
            None => Value::None,
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: Object> IntoValue for Arc<T> {
    fn into_value(self) -> Value { Value::Object(self) }
}

// ------------------------------- Tests ------------------------------------ //
