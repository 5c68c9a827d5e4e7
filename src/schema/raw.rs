//! Loose schema descriptions and their validation.
//!
//! A description is the dictionary form of a schema: every attribute maps to
//! an object carrying `name`, `optional`, `type` and, for record types, a
//! nested `schema`. Facets are kept as untyped JSON so that a missing facet
//! and a facet of the wrong kind can be told apart.
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as Json;

use super::{FieldKind, FieldSpec, ScalarType, Schema};
use crate::registry::RecordTypeRegistry;

pub type RawSchema = IndexMap<String, RawFieldSpec>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFieldSpec {
    #[serde(default)]
    pub name: Option<Json>,
    #[serde(default)]
    pub optional: Option<Json>,
    #[serde(default, rename = "type")]
    pub ty: Option<Json>,
    #[serde(default)]
    pub schema: Option<RawSchema>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("schema field must have a `{0}`")]
    MissingField(&'static str),
    #[error("schema field `{facet}` must be a {expected}")]
    WrongKind { facet: &'static str, expected: &'static str },
    #[error("schema must be a mapping")]
    NotAMapping,
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("type `{0}` is not a record type and cannot carry a nested schema")]
    UnexpectedNestedSchema(String),
    #[error("at JSON path {path} → {message}")]
    Parse { path: String, message: String },
    #[error("in field `{attr}`: {source}")]
    InField { attr: String, source: Box<SchemaError> },
}

impl SchemaError {
    /// The innermost error, without the field path wrappers.
    pub fn root_cause(&self) -> &SchemaError {
        match self {
            SchemaError::InField { source, .. } => source.root_cause(),
            other => other,
        }
    }

    fn in_field(self, attr: &str) -> Self {
        SchemaError::InField { attr: attr.to_string(), source: Box::new(self) }
    }
}

// ------------------------------ Validation -------------------------------- //

/// Checks the three mandatory facets, in order: `name` (string), `optional`
/// (bool), `type` (present).
pub fn validate(field: &RawFieldSpec) -> Result<(), SchemaError> {
    match &field.name {
        None => return Err(SchemaError::MissingField("name")),
        Some(Json::String(_)) => {}
        Some(_) => return Err(SchemaError::WrongKind { facet: "name", expected: "string" }),
    }
    match &field.optional {
        None => return Err(SchemaError::MissingField("optional")),
        Some(Json::Bool(_)) => {}
        Some(_) => return Err(SchemaError::WrongKind { facet: "optional", expected: "bool" }),
    }
    if field.ty.is_none() {
        return Err(SchemaError::MissingField("type"));
    }
    Ok(())
}

// ------------------------------ Conversion -------------------------------- //

impl Schema {
    /// Validates every field of `raw` and builds the typed schema. Record
    /// type names are resolved through `registry`.
    pub fn from_raw(raw: &RawSchema, registry: &RecordTypeRegistry) -> Result<Self, SchemaError> {
        raw.iter()
            .map(|(attr, field)| {
                convert_field(field, registry)
                    .map(|spec| (attr.clone(), spec))
                    .map_err(|e| e.in_field(attr))
            })
            .collect()
    }

    /// Parses a JSON description and converts it with [`Schema::from_raw`].
    pub fn from_json_str(src: &str, registry: &RecordTypeRegistry) -> Result<Self, SchemaError> {
        let top = serde_json::from_str::<Json>(src).map_err(|err| SchemaError::Parse {
            path: ".".to_string(),
            message: err.to_string(),
        })?;
        if !top.is_object() {
            return Err(SchemaError::NotAMapping);
        }
        let raw = serde_path_to_error::deserialize::<_, RawSchema>(top).map_err(|err| {
            SchemaError::Parse { path: err.path().to_string(), message: err.into_inner().to_string() }
        })?;
        Self::from_raw(&raw, registry)
    }
}

fn convert_field(field: &RawFieldSpec, registry: &RecordTypeRegistry) -> Result<FieldSpec, SchemaError> {
    validate(field)?;
    let (Some(Json::String(name)), Some(Json::Bool(optional)), Some(ty)) =
        (&field.name, &field.optional, &field.ty)
    else {
        // validate() above guarantees the facet shapes
        return Err(SchemaError::MissingField("type"));
    };
    let Json::String(ty) = ty else {
        return Err(SchemaError::WrongKind { facet: "type", expected: "string" });
    };
    let kind = parse_kind(ty.trim(), field.schema.as_ref(), registry)?;
    let spec = FieldSpec::new(name.clone(), kind);
    Ok(if *optional { spec.optional() } else { spec })
}

fn parse_kind(
    ty: &str,
    schema: Option<&RawSchema>,
    registry: &RecordTypeRegistry,
) -> Result<FieldKind, SchemaError> {
    if let Some(item) = ty.strip_prefix("list[").and_then(|s| s.strip_suffix(']')) {
        let item = parse_kind(item.trim(), schema, registry)?;
        return Ok(FieldKind::ListOf(Box::new(item)));
    }
    if let Some(scalar) = ScalarType::from_name(ty) {
        if schema.is_some() {
            return Err(SchemaError::UnexpectedNestedSchema(ty.to_string()));
        }
        return Ok(FieldKind::Scalar(scalar));
    }
    let record = registry
        .lookup(ty)
        .ok_or_else(|| SchemaError::UnknownType(ty.to_string()))?;
    let nested = schema.ok_or(SchemaError::MissingField("schema"))?;
    let nested = Schema::from_raw(nested, registry)?;
    Ok(FieldKind::Record { ty: record, schema: Arc::new(nested) })
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Clone)]
    struct Address {
        city: String,
    }
    crate::record!(Address { city });

    fn raw(v: Json) -> RawFieldSpec {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn validate_reports_facets_in_order() {
        assert_eq!(validate(&raw(json!({}))), Err(SchemaError::MissingField("name")));
        assert_eq!(
            validate(&raw(json!({"name": 1, "optional": true, "type": "int"}))),
            Err(SchemaError::WrongKind { facet: "name", expected: "string" })
        );
        assert_eq!(
            validate(&raw(json!({"name": "a", "type": "int"}))),
            Err(SchemaError::MissingField("optional"))
        );
        assert_eq!(
            validate(&raw(json!({"name": "a", "optional": "no", "type": "int"}))),
            Err(SchemaError::WrongKind { facet: "optional", expected: "bool" })
        );
        assert_eq!(
            validate(&raw(json!({"name": "a", "optional": false}))),
            Err(SchemaError::MissingField("type"))
        );
        assert_eq!(validate(&raw(json!({"name": "a", "optional": false, "type": "int"}))), Ok(()));
    }

    #[test]
    fn description_converts_to_typed_schema() {
        let registry = RecordTypeRegistry::new();
        registry.register::<Address>();
        let schema = Schema::from_json_str(
            r#"{
                "id":    {"name": "id", "optional": false, "type": "int"},
                "tags":  {"name": "tags", "optional": true, "type": "list[str]"},
                "home":  {"name": "homeAddress", "optional": true, "type": "Address",
                          "schema": {"city": {"name": "city", "optional": false, "type": "str"}}}
            }"#,
            &registry,
        )
        .unwrap();

        let attrs: Vec<_> = schema.iter().map(|(k, _)| k).collect();
        assert_eq!(attrs, vec!["id", "tags", "home"]);
        assert_eq!(schema.get("tags").unwrap().kind().describe(), "list[str]");
        let home = schema.get("home").unwrap();
        assert_eq!(home.output_name(), "homeAddress");
        assert!(home.is_optional());
        assert_eq!(home.nested_schema().unwrap().len(), 1);
    }

    #[test]
    fn record_types_need_a_nested_schema() {
        let registry = RecordTypeRegistry::new();
        registry.register::<Address>();
        let err = Schema::from_json_str(
            r#"{"home": {"name": "home", "optional": false, "type": "Address"}}"#,
            &registry,
        )
        .unwrap_err();
        assert_eq!(err.root_cause(), &SchemaError::MissingField("schema"));
        assert!(err.to_string().starts_with("in field `home`"));
    }

    #[test]
    fn unknown_and_misplaced_types() {
        let registry = RecordTypeRegistry::new();
        let err = Schema::from_json_str(
            r#"{"x": {"name": "x", "optional": false, "type": "Nope"}}"#,
            &registry,
        )
        .unwrap_err();
        assert_eq!(err.root_cause(), &SchemaError::UnknownType("Nope".into()));

        let err = Schema::from_json_str(
            r#"{"x": {"name": "x", "optional": false, "type": "int", "schema": {}}}"#,
            &registry,
        )
        .unwrap_err();
        assert_eq!(err.root_cause(), &SchemaError::UnexpectedNestedSchema("int".into()));

        let err = Schema::from_json_str(
            r#"{"x": {"name": "x", "optional": false, "type": 3}}"#,
            &registry,
        )
        .unwrap_err();
        assert_eq!(
            err.root_cause(),
            &SchemaError::WrongKind { facet: "type", expected: "string" }
        );
    }

    #[test]
    fn malformed_descriptions_carry_a_path() {
        let registry = RecordTypeRegistry::new();
        assert_eq!(Schema::from_json_str("[]", &registry), Err(SchemaError::NotAMapping));
        let err = Schema::from_json_str(r#"{"x": 5}"#, &registry).unwrap_err();
        match err {
            SchemaError::Parse { path, .. } => assert_eq!(path, "x"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
