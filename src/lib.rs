//! Schema-guided fast dumping of records into ordered mappings or compact JSON.
//!
//! ```
//! use record_dump::{record, FieldSpec, ScalarType, Schema, IntoValue};
//!
//! #[derive(Clone)]
//! struct Item { id: i64, tag: Option<String> }
//! record!(Item { id, tag });
//!
//! let schema = Schema::new()
//!     .field("id", FieldSpec::scalar("id", ScalarType::Integer))
//!     .field("tag", FieldSpec::scalar("tag", ScalarType::String).optional());
//! let value = Item { id: 5, tag: None }.into_value();
//!
//! let bytes = record_dump::dump_to_json_bytes(&schema, &value).unwrap();
//! assert_eq!(bytes, br#"{"id":5}"#);
//! ```
pub mod classify;
pub mod dump;
pub mod error;
pub mod registry;
pub mod samples;
pub mod schema;
pub mod value;

use once_cell::sync::Lazy;

pub use classify::{classify, Category, Leaf};
pub use dump::{DumpValue, Dumper, Mapping};
pub use error::{DumpError, DumpErrorKind, FieldPath};
pub use registry::{RecordTypeRef, RecordTypeRegistry};
pub use schema::{FieldKind, FieldSpec, RawFieldSpec, RawSchema, ScalarType, Schema, SchemaError};
pub use value::{DecimalValue, IntoValue, Object, Record, RecordType, Value};

static DEFAULT_DUMPER: Lazy<Dumper> = Lazy::new(Dumper::new);

/// [`Dumper::dump_to_mapping`] on the shared registry.
pub fn dump_to_mapping(schema: &Schema, value: &Value) -> Result<DumpValue, DumpError> {
    DEFAULT_DUMPER.dump_to_mapping(schema, value)
}

/// [`Dumper::dump_to_json_bytes`] on the shared registry.
pub fn dump_to_json_bytes(schema: &Schema, value: &Value) -> Result<Vec<u8>, DumpError> {
    DEFAULT_DUMPER.dump_to_json_bytes(schema, value)
}
