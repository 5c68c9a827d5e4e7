//! Strongly-typed dump schema.
//!
//! A [`Schema`] maps attribute names to [`FieldSpec`]s; iteration order is
//! output order. Schemas are immutable once built and are either assembled in
//! code or converted (and validated) from a loose [`RawSchema`] description.
pub mod raw;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::registry::RecordTypeRef;
use crate::value::{Record, Value};

pub use raw::{validate, RawFieldSpec, RawSchema, SchemaError};

// ------------------------------- Types ------------------------------------ //

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: IndexMap<String, FieldSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    output_name: String,
    optional: bool,
    kind: FieldKind,
}

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Scalar(ScalarType),
    Record { ty: RecordTypeRef, schema: Arc<Schema> },
    ListOf(Box<FieldKind>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Bool,
    Integer,
    Float,
    String,
    Date,
    DateTime,
    Uuid,
    Decimal,
    /// Accepts any present value; conversion is left to the classifier.
    Any,
}

// ------------------------------- Schema ----------------------------------- //

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces, keeping its position) the spec for `attr`.
    pub fn field(mut self, attr: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(attr.into(), spec);
        self
    }

    pub fn get(&self, attr: &str) -> Option<&FieldSpec> {
        self.fields.get(attr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldSpec)> for Schema {
    fn from_iter<I: IntoIterator<Item = (String, FieldSpec)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().collect() }
    }
}

// ------------------------------ FieldSpec --------------------------------- //

impl FieldSpec {
    /// A required field.
    pub fn new(output_name: impl Into<String>, kind: FieldKind) -> Self {
        Self { output_name: output_name.into(), optional: false, kind }
    }

    pub fn scalar(output_name: impl Into<String>, ty: ScalarType) -> Self {
        Self::new(output_name, FieldKind::Scalar(ty))
    }

    pub fn record<T: Record>(output_name: impl Into<String>, schema: impl Into<Arc<Schema>>) -> Self {
        Self::new(output_name, FieldKind::record::<T>(schema))
    }

    pub fn list_of(output_name: impl Into<String>, item: FieldKind) -> Self {
        Self::new(output_name, FieldKind::ListOf(Box::new(item)))
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Same as [`FieldSpec::kind`]; the name used throughout the docs.
    pub fn declared_type(&self) -> &FieldKind {
        &self.kind
    }

    pub fn nested_schema(&self) -> Option<&Schema> {
        match &self.kind {
            FieldKind::Record { schema, .. } => Some(schema.as_ref()),
            _ => None,
        }
    }
}

// ------------------------------ FieldKind --------------------------------- //

impl FieldKind {
    pub fn record<T: Record>(schema: impl Into<Arc<Schema>>) -> Self {
        FieldKind::Record { ty: RecordTypeRef::of::<T>(), schema: schema.into() }
    }

    /// Instance check of a present value against the declared type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::None) => false,
            (FieldKind::Scalar(ty), v) => ty.accepts(v),
            (FieldKind::Record { ty, .. }, Value::Object(obj)) => ty.matches(obj.as_ref()),
            (FieldKind::ListOf(_), Value::List(_)) => true,
            _ => false,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FieldKind::Scalar(ty) => ty.name().to_string(),
            FieldKind::Record { ty, .. } => ty.name().to_string(),
            FieldKind::ListOf(item) => format!("list[{}]", item.describe()),
        }
    }
}

impl ScalarType {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Integer => "int",
            ScalarType::Float => "float",
            ScalarType::String => "str",
            ScalarType::Date => "date",
            ScalarType::DateTime => "datetime",
            ScalarType::Uuid => "uuid",
            ScalarType::Decimal => "decimal",
            ScalarType::Any => "any",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "bool" | "boolean" => ScalarType::Bool,
            "int" | "integer" => ScalarType::Integer,
            "float" => ScalarType::Float,
            "str" | "string" => ScalarType::String,
            "date" => ScalarType::Date,
            "datetime" => ScalarType::DateTime,
            "uuid" => ScalarType::Uuid,
            "decimal" => ScalarType::Decimal,
            "any" | "object" => ScalarType::Any,
            _ => return None,
        })
    }

    /// Booleans are not integers and integers are not floats. A date-time is
    /// also a date.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ScalarType::Any => !value.is_none(),
            ScalarType::Bool => matches!(value, Value::Bool(_)),
            ScalarType::Integer => matches!(value, Value::Int(_)),
            ScalarType::Float => matches!(value, Value::Float(_)),
            ScalarType::String => matches!(value, Value::Str(_)),
            ScalarType::Date => {
                matches!(value, Value::Date(_) | Value::DateTime(_) | Value::DateTimeTz(_))
            }
            ScalarType::DateTime => matches!(value, Value::DateTime(_) | Value::DateTimeTz(_)),
            ScalarType::Uuid => matches!(value, Value::Uuid(_)),
            ScalarType::Decimal => matches!(value, Value::Decimal(_)),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
