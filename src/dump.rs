//! Schema-guided recursive dump.
//!
//! Both output forms share one traversal: walk the schema fields in order,
//! fetch the attribute, apply the optional/required rule, check the declared
//! type, classify, convert and emit. A [`Target`] decides what the emitted
//! nodes are.
pub mod json;
pub mod mapping;

use std::marker::PhantomData;
use std::sync::Arc;

use crate::classify::{self, Category, Leaf};
use crate::error::{DumpError, DumpErrorKind, FieldPath, Segment};
use crate::registry::RecordTypeRegistry;
use crate::schema::{FieldKind, Schema, SchemaError};
use crate::value::{Object, Value};

pub use json::JsonTarget;
pub use mapping::{DumpValue, Mapping, MappingTarget};

// ------------------------------- Targets ---------------------------------- //

/// Output representation of a dump.
pub trait Target {
    type Node;
    type Object;

    fn object(capacity: usize) -> Self::Object;
    fn insert(object: &mut Self::Object, key: &str, node: Self::Node);
    fn finish(object: Self::Object) -> Self::Node;
    fn list(items: Vec<Self::Node>) -> Self::Node;
    fn leaf(leaf: Leaf) -> Result<Self::Node, DumpErrorKind>;
}

// ------------------------------- Walker ----------------------------------- //

struct Walker<'r, T> {
    registry: &'r RecordTypeRegistry,
    path: FieldPath,
    _target: PhantomData<T>,
}

impl<'r, T: Target> Walker<'r, T> {
    fn new(registry: &'r RecordTypeRegistry) -> Self {
        Self { registry, path: FieldPath::default(), _target: PhantomData }
    }

    fn fail(&self, kind: impl Into<DumpErrorKind>) -> DumpError {
        DumpError::new(self.path.clone(), kind.into())
    }

    /// Top level: a record, or a (possibly nested) list of records that all
    /// share `schema`.
    fn dump(&mut self, schema: &Schema, value: &Value) -> Result<T::Node, DumpError> {
        match value {
            Value::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    self.path.push(Segment::Index(i));
                    out.push(self.dump(schema, item)?);
                    self.path.pop();
                }
                Ok(T::list(out))
            }
            Value::Object(obj) if self.registry.is_record_object(obj.as_ref()) => {
                self.record(schema, obj.as_ref())
            }
            other => Err(self.fail(DumpErrorKind::NotARecord {
                found: other.type_name().to_string(),
            })),
        }
    }

    fn record(&mut self, schema: &Schema, obj: &dyn Object) -> Result<T::Node, DumpError> {
        let mut out = T::object(schema.len());
        for (attr, spec) in schema.iter() {
            self.path.push(Segment::Field(attr.to_string()));
            let value = obj.get_attr(attr).ok_or_else(|| {
                self.fail(DumpErrorKind::AttributeAccess {
                    attr: attr.to_string(),
                    record: obj.type_name().to_string(),
                })
            })?;
            if value.is_none() {
                if spec.is_optional() {
                    self.path.pop();
                    continue;
                }
                return Err(self.fail(DumpErrorKind::RequiredFieldMissing {
                    field: spec.output_name().to_string(),
                }));
            }
            let node = self.field(spec.output_name(), spec.kind(), &value)?;
            T::insert(&mut out, spec.output_name(), node);
            self.path.pop();
        }
        Ok(T::finish(out))
    }

    /// One present field value (or list element) against its declared kind.
    fn field(&mut self, name: &str, kind: &FieldKind, value: &Value) -> Result<T::Node, DumpError> {
        if !kind.accepts(value) {
            return Err(self.fail(DumpErrorKind::TypeMismatch {
                field: name.to_string(),
                expected: kind.describe(),
                found: value.type_name().to_string(),
            }));
        }
        match classify::classify(value, self.registry) {
            Category::Null => Err(self.fail(DumpErrorKind::RequiredFieldMissing {
                field: name.to_string(),
            })),
            Category::Record => {
                let (FieldKind::Record { schema, .. }, Value::Object(obj)) = (kind, value) else {
                    return Err(self.fail(SchemaError::MissingField("schema")));
                };
                self.record(schema, obj.as_ref())
            }
            Category::List => {
                let (FieldKind::ListOf(item), Value::List(items)) = (kind, value) else {
                    return Err(self.fail(DumpErrorKind::UnsupportedType {
                        type_name: value.type_name().to_string(),
                    }));
                };
                let mut out = Vec::with_capacity(items.len());
                for (i, element) in items.iter().enumerate() {
                    self.path.push(Segment::Index(i));
                    if element.is_none() {
                        return Err(self.fail(DumpErrorKind::RequiredFieldMissing {
                            field: name.to_string(),
                        }));
                    }
                    out.push(self.field(name, item, element)?);
                    self.path.pop();
                }
                Ok(T::list(out))
            }
            Category::Unsupported => Err(self.fail(DumpErrorKind::UnsupportedType {
                type_name: value.type_name().to_string(),
            })),
            Category::Boolean
            | Category::String
            | Category::Integer
            | Category::Float
            | Category::DateTime
            | Category::UniqueId
            | Category::Decimal => {
                let leaf = classify::convert(value).map_err(|kind| self.fail(kind))?;
                T::leaf(leaf).map_err(|kind| self.fail(kind))
            }
        }
    }
}

// ------------------------------- Dumper ----------------------------------- //

/// Entry points for both output forms, bound to one record-type registry.
#[derive(Clone)]
pub struct Dumper {
    registry: Arc<RecordTypeRegistry>,
}

impl Default for Dumper {
    fn default() -> Self {
        Self::new()
    }
}

impl Dumper {
    /// A dumper backed by the process-wide shared registry.
    pub fn new() -> Self {
        Self::with_registry(RecordTypeRegistry::shared())
    }

    pub fn with_registry(registry: Arc<RecordTypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<RecordTypeRegistry> {
        &self.registry
    }

    /// Generic entry point over any [`Target`].
    pub fn dump_with<T: Target>(&self, schema: &Schema, value: &Value) -> Result<T::Node, DumpError> {
        tracing::trace!(fields = schema.len(), value = value.type_name(), "dump");
        Walker::<T>::new(&self.registry).dump(schema, value).inspect_err(|err| {
            tracing::debug!(path = %err.path(), error = %err.kind(), "dump aborted");
        })
    }

    /// Ordered mapping (or list of mappings) for a record (or list of records).
    pub fn dump_to_mapping(&self, schema: &Schema, value: &Value) -> Result<DumpValue, DumpError> {
        self.dump_with::<MappingTarget>(schema, value)
    }

    pub fn dump_to_json_value(&self, schema: &Schema, value: &Value) -> Result<serde_json::Value, DumpError> {
        self.dump_with::<JsonTarget>(schema, value)
    }

    /// Compact UTF-8 JSON.
    pub fn dump_to_json_bytes(&self, schema: &Schema, value: &Value) -> Result<Vec<u8>, DumpError> {
        let json = self.dump_to_json_value(schema, value)?;
        serde_json::to_vec(&json)
            .map_err(|err| DumpError::new(FieldPath::default(), DumpErrorKind::Encode(err.to_string())))
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, ScalarType};
    use crate::value::{DecimalValue, IntoValue};

    #[derive(Clone)]
    struct Line {
        sku: String,
        qty: i64,
        price: DecimalValue,
        gift: Option<bool>,
    }
    crate::record!(Line { sku, qty, price, gift });

    #[derive(Clone)]
    struct Order {
        id: i64,
        note: Option<String>,
        lines: Vec<Line>,
        first: Option<Line>,
    }
    crate::record!(Order { id, note, lines, first });

    struct Handle;

    impl Object for Handle {
        fn get_attr(&self, _name: &str) -> Option<Value> { None }
    }

    fn line_schema() -> Schema {
        Schema::new()
            .field("sku", FieldSpec::scalar("sku", ScalarType::String))
            .field("qty", FieldSpec::scalar("qty", ScalarType::Integer))
            .field("price", FieldSpec::scalar("price", ScalarType::Decimal))
            .field("gift", FieldSpec::scalar("gift", ScalarType::Bool).optional())
    }

    fn order_schema() -> Schema {
        let line = Arc::new(line_schema());
        Schema::new()
            .field("id", FieldSpec::scalar("id", ScalarType::Integer))
            .field("note", FieldSpec::scalar("note", ScalarType::String).optional())
            .field("lines", FieldSpec::list_of("lines", FieldKind::record::<Line>(Arc::clone(&line))))
            .field("first", FieldSpec::record::<Line>("firstLine", line).optional())
    }

    fn line(sku: &str, qty: i64) -> Line {
        Line { sku: sku.into(), qty, price: "1.50".parse().unwrap(), gift: None }
    }

    fn dumper() -> Dumper {
        Dumper::with_registry(Arc::new(RecordTypeRegistry::new()))
    }

    #[test]
    fn nested_records_and_lists() {
        let order = Order {
            id: 7,
            note: None,
            lines: vec![line("a", 1), Line { gift: Some(true), ..line("b", 2) }],
            first: Some(line("a", 1)),
        };
        let bytes = dumper().dump_to_json_bytes(&order_schema(), &order.into_value()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"id":7,"lines":[{"sku":"a","qty":1,"price":"1.50"},{"sku":"b","qty":2,"price":"1.50","gift":true}],"firstLine":{"sku":"a","qty":1,"price":"1.50"}}"#
        );
    }

    #[test]
    fn errors_carry_the_failing_path() {
        let mut bad = line("b", 2);
        bad.price = DecimalValue::NaN;
        let order = Order { id: 1, note: None, lines: vec![line("a", 1), bad], first: None };
        let err = dumper().dump_to_mapping(&order_schema(), &order.into_value()).unwrap_err();
        assert_eq!(err.path().to_string(), "$.lines[1].price");
        assert!(matches!(err.kind(), DumpErrorKind::InvalidNumeric { .. }));
    }

    #[test]
    fn top_level_must_be_a_record() {
        let err = dumper().dump_to_mapping(&line_schema(), &Value::Int(3)).unwrap_err();
        assert!(matches!(err.kind(), DumpErrorKind::NotARecord { .. }));
        let err = dumper()
            .dump_to_json_bytes(&line_schema(), &Value::list(vec![Value::object(Handle)]))
            .unwrap_err();
        assert!(matches!(err.kind(), DumpErrorKind::NotARecord { .. }));
        assert_eq!(err.path().to_string(), "$[0]");
    }

    #[test]
    fn missing_attribute_is_reported() {
        let schema = line_schema().field("colour", FieldSpec::scalar("colour", ScalarType::String));
        let err = dumper().dump_to_mapping(&schema, &line("a", 1).into_value()).unwrap_err();
        assert!(matches!(
            err.kind(),
            DumpErrorKind::AttributeAccess { attr, .. } if attr == "colour"
        ));
    }

    #[test]
    fn record_under_any_needs_a_schema() {
        #[derive(Clone)]
        struct Wrapper {
            inner: Line,
        }
        crate::record!(Wrapper { inner });

        let schema = Schema::new().field("inner", FieldSpec::scalar("inner", ScalarType::Any));
        let err = dumper()
            .dump_to_mapping(&schema, &Wrapper { inner: line("a", 1) }.into_value())
            .unwrap_err();
        assert_eq!(err.kind(), &DumpErrorKind::Schema(SchemaError::MissingField("schema")));
    }

    #[test]
    fn unsupported_values_fail_on_both_paths() {
        #[derive(Clone)]
        struct Holder {
            h: Value,
        }
        crate::record!(Holder { h });

        let schema = Schema::new().field("h", FieldSpec::scalar("h", ScalarType::Any));
        let value = Holder { h: Value::object(Handle) }.into_value();
        let d = dumper();
        for err in [
            d.dump_to_mapping(&schema, &value).unwrap_err(),
            d.dump_to_json_bytes(&schema, &value).unwrap_err(),
        ] {
            assert!(matches!(err.kind(), DumpErrorKind::UnsupportedType { .. }));
        }
    }

    #[test]
    fn null_list_elements_are_rejected() {
        #[derive(Clone)]
        struct Tags {
            tags: Vec<Option<String>>,
        }
        crate::record!(Tags { tags });

        let schema = Schema::new().field(
            "tags",
            FieldSpec::list_of("tags", FieldKind::Scalar(ScalarType::String)),
        );
        let value = Tags { tags: vec![Some("a".into()), None] }.into_value();
        let err = dumper().dump_to_json_bytes(&schema, &value).unwrap_err();
        assert!(matches!(err.kind(), DumpErrorKind::RequiredFieldMissing { .. }));
        assert_eq!(err.path().to_string(), "$.tags[1]");
    }

    #[test]
    fn non_finite_floats_only_fail_as_json() {
        #[derive(Clone)]
        struct Reading {
            v: f64,
        }
        crate::record!(Reading { v });

        let schema = Schema::new().field("v", FieldSpec::scalar("v", ScalarType::Float));
        let value = Reading { v: f64::INFINITY }.into_value();
        let d = dumper();
        assert!(d.dump_to_mapping(&schema, &value).is_ok());
        let err = d.dump_to_json_bytes(&schema, &value).unwrap_err();
        assert!(matches!(err.kind(), DumpErrorKind::InvalidNumeric { .. }));
    }
}
