use std::fmt;

use crate::schema::SchemaError;

/// Why a dump was aborted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DumpErrorKind {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("object must be a record, got {found}")]
    NotARecord { found: String },
    #[error("cannot read attribute `{attr}` of {record}")]
    AttributeAccess { attr: String, record: String },
    #[error("field `{field}` is not optional but holds no value")]
    RequiredFieldMissing { field: String },
    #[error("field `{field}` has a wrong type: expected {expected}, found {found}")]
    TypeMismatch { field: String, expected: String, found: String },
    #[error("invalid numeric value {value}")]
    InvalidNumeric { value: String },
    #[error("unsupported type {type_name}")]
    UnsupportedType { type_name: String },
    #[error("failed to encode JSON: {0}")]
    Encode(String),
}

/// A dump failure together with the location it happened at.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} (at {path})")]
pub struct DumpError {
    path: FieldPath,
    kind: DumpErrorKind,
}

impl DumpError {
    pub(crate) fn new(path: FieldPath, kind: DumpErrorKind) -> Self {
        Self { path, kind }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn kind(&self) -> &DumpErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> DumpErrorKind {
        self.kind
    }
}

// ------------------------------- Paths ------------------------------------ //

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(usize),
}

/// Location inside the dumped value, rendered as `$.items[2].amount`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub(crate) fn push(&mut self, seg: Segment) {
        self.0.push(seg);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for seg in &self.0 {
            match seg {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}
