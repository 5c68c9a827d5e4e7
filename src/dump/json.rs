//! Direct JSON output.
use serde_json::{Map, Number, Value as Json};

use super::Target;
use crate::classify::Leaf;
use crate::error::DumpErrorKind;

pub enum JsonTarget {}

impl Target for JsonTarget {
    type Node = Json;
    type Object = Map<String, Json>;

    fn object(capacity: usize) -> Map<String, Json> {
        Map::with_capacity(capacity)
    }

    fn insert(object: &mut Map<String, Json>, key: &str, node: Json) {
        object.insert(key.to_string(), node);
    }

    fn finish(object: Map<String, Json>) -> Json {
        Json::Object(object)
    }

    fn list(items: Vec<Json>) -> Json {
        Json::Array(items)
    }

    fn leaf(leaf: Leaf) -> Result<Json, DumpErrorKind> {
        Ok(match leaf {
            Leaf::Bool(b) => Json::Bool(b),
            Leaf::Int(i) => Json::Number(i.into()),
            Leaf::Float(f) => Json::Number(
                Number::from_f64(f)
                    .ok_or_else(|| DumpErrorKind::InvalidNumeric { value: f.to_string() })?,
            ),
            Leaf::Str(s) => Json::String(s),
        })
    }
}
