//! Ordered-mapping output.
use indexmap::IndexMap;
use serde::Serialize;

use super::Target;
use crate::classify::Leaf;
use crate::error::DumpErrorKind;

pub type Mapping = IndexMap<String, DumpValue>;

/// Generic output value. Absent optional fields never appear, so there is no
/// null variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DumpValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Mapping(Mapping),
    List(Vec<DumpValue>),
}

impl DumpValue {
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            DumpValue::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DumpValue]> {
        match self {
            DumpValue::List(xs) => Some(xs),
            _ => None,
        }
    }

    /// Key lookup on a mapping; `None` for other variants.
    pub fn get(&self, key: &str) -> Option<&DumpValue> {
        self.as_mapping().and_then(|m| m.get(key))
    }
}

impl From<DumpValue> for serde_json::Value {
    fn from(v: DumpValue) -> Self {
        match v {
            DumpValue::Bool(b) => serde_json::Value::Bool(b),
            DumpValue::Int(i) => serde_json::Value::from(i),
            DumpValue::Float(f) => serde_json::Value::from(f),
            DumpValue::Str(s) => serde_json::Value::String(s),
            DumpValue::Mapping(m) => serde_json::Value::Object(
                m.into_iter().map(|(k, v)| (k, serde_json::Value::from(v))).collect(),
            ),
            DumpValue::List(xs) => {
                serde_json::Value::Array(xs.into_iter().map(serde_json::Value::from).collect())
            }
        }
    }
}

pub enum MappingTarget {}

impl Target for MappingTarget {
    type Node = DumpValue;
    type Object = Mapping;

    fn object(capacity: usize) -> Mapping {
        IndexMap::with_capacity(capacity)
    }

    fn insert(object: &mut Mapping, key: &str, node: DumpValue) {
        object.insert(key.to_string(), node);
    }

    fn finish(object: Mapping) -> DumpValue {
        DumpValue::Mapping(object)
    }

    fn list(items: Vec<DumpValue>) -> DumpValue {
        DumpValue::List(items)
    }

    fn leaf(leaf: Leaf) -> Result<DumpValue, DumpErrorKind> {
        Ok(match leaf {
            Leaf::Bool(b) => DumpValue::Bool(b),
            Leaf::Int(i) => DumpValue::Int(i),
            Leaf::Float(f) => DumpValue::Float(f),
            Leaf::Str(s) => DumpValue::Str(s),
        })
    }
}
