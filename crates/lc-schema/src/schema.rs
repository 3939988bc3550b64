//! Configuration schema model.
//!
//! Schemas serialize to JSON with an internal `type` tag, so they can be
//! declared in data as well as built in code:
//!
//! ```json
//! {"type": "shape", "fields": [
//!     {"name": "bucket_prefix", "schema": {"type": "string"}},
//!     {"name": "retries", "schema": {"type": "int"}, "default": 3}
//! ]}
//! ```

use lc_common::value::CONFIG_KEY;
use lc_common::{ConfigValue, DefinitionError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::validate::process_config;

/// The type of a configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfigType {
    Any,
    Bool,
    Int,
    /// Accepts integers as well as floats.
    Float,
    String,
    Array {
        of: Box<ConfigType>,
    },
    /// The inner type, or `null`.
    Noneable {
        of: Box<ConfigType>,
    },
    Enum {
        values: Vec<String>,
    },
    /// A mapping with exactly the declared fields.
    Shape {
        fields: Shape,
    },
    /// A mapping with the declared fields; undeclared keys pass through.
    Permissive {
        fields: Shape,
    },
    /// A mapping from arbitrary string keys to values of one type.
    Map {
        of: Box<ConfigType>,
    },
    /// A mapping holding exactly one of the declared fields.
    Selector {
        fields: Shape,
    },
}

impl ConfigType {
    pub fn array(of: ConfigType) -> Self {
        ConfigType::Array { of: Box::new(of) }
    }

    pub fn noneable(of: ConfigType) -> Self {
        ConfigType::Noneable { of: Box::new(of) }
    }

    pub fn map(of: ConfigType) -> Self {
        ConfigType::Map { of: Box::new(of) }
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConfigType::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn shape<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Field)>,
        K: Into<String>,
    {
        ConfigType::Shape {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn permissive<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Field)>,
        K: Into<String>,
    {
        ConfigType::Permissive {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn selector<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Field)>,
        K: Into<String>,
    {
        ConfigType::Selector {
            fields: fields.into_iter().collect(),
        }
    }

    /// Whether `null` is an acceptable value.
    pub fn is_noneable(&self) -> bool {
        matches!(self, ConfigType::Noneable { .. } | ConfigType::Any)
    }

    /// A shape whose fields are all optional can be omitted entirely.
    pub fn all_fields_optional(&self) -> bool {
        match self {
            ConfigType::Shape { fields } | ConfigType::Permissive { fields } => {
                !fields.has_required_fields()
            }
            _ => false,
        }
    }

    /// Short description used in validation messages.
    pub fn describe(&self) -> String {
        match self {
            ConfigType::Any => "Any".to_string(),
            ConfigType::Bool => "Bool".to_string(),
            ConfigType::Int => "Int".to_string(),
            ConfigType::Float => "Float".to_string(),
            ConfigType::String => "String".to_string(),
            ConfigType::Array { of } => format!("[{}]", of.describe()),
            ConfigType::Noneable { of } => format!("Noneable({})", of.describe()),
            ConfigType::Enum { values } => format!("Enum({})", values.join("|")),
            ConfigType::Shape { .. } => "Shape".to_string(),
            ConfigType::Permissive { .. } => "Permissive".to_string(),
            ConfigType::Map { of } => format!("Map(String, {})", of.describe()),
            ConfigType::Selector { .. } => "Selector".to_string(),
        }
    }

    fn check_definition(&self, path: &str) -> Result<(), String> {
        match self {
            ConfigType::Any
            | ConfigType::Bool
            | ConfigType::Int
            | ConfigType::Float
            | ConfigType::String => Ok(()),
            ConfigType::Array { of } | ConfigType::Noneable { of } | ConfigType::Map { of } => {
                of.check_definition(path)
            }
            ConfigType::Enum { values } => {
                if values.is_empty() {
                    return Err(format!("enum at {path} declares no values"));
                }
                let mut seen = HashSet::new();
                for value in values {
                    if !seen.insert(value.as_str()) {
                        return Err(format!("enum at {path} repeats value \"{value}\""));
                    }
                }
                Ok(())
            }
            ConfigType::Shape { fields } | ConfigType::Permissive { fields } => {
                fields.check_definition(path)
            }
            ConfigType::Selector { fields } => {
                if fields.is_empty() {
                    return Err(format!("selector at {path} declares no fields"));
                }
                fields.check_definition(path)
            }
        }
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// A declared field of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "schema")]
    pub config_type: ConfigType,

    /// Explicit requiredness; inferred when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ConfigValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    pub fn new(config_type: ConfigType) -> Self {
        Self {
            config_type,
            required: None,
            default: None,
            description: None,
        }
    }

    pub fn with_default(mut self, default: ConfigValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Required unless it has a default, accepts `null`, is an all-optional
    /// shape, or was explicitly marked optional.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or_else(|| {
            self.default.is_none()
                && !self.config_type.is_noneable()
                && !self.config_type.all_fields_optional()
        })
    }
}

impl From<ConfigType> for Field {
    fn from(config_type: ConfigType) -> Self {
        Field::new(config_type)
    }
}

/// A named field inside a [`Shape`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeField {
    pub name: String,
    #[serde(flatten)]
    pub field: Field,
}

/// Ordered field declarations of a mapping type.
///
/// Declaration order is preserved; validation reports errors in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape {
    fields: Vec<ShapeField>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing an earlier declaration of the same name.
    pub fn field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.insert(name.into(), field.into());
        self
    }

    fn insert(&mut self, name: String, field: Field) {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.field = field,
            None => self.fields.push(ShapeField { name, field }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.field)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|f| (f.name.as_str(), &f.field))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has_required_fields(&self) -> bool {
        self.fields.iter().any(|f| f.field.is_required())
    }

    fn check_definition(&self, path: &str) -> Result<(), String> {
        let mut seen = HashSet::new();
        for ShapeField { name, field } in &self.fields {
            if !seen.insert(name.as_str()) {
                return Err(format!("field \"{name}\" declared twice at {path}"));
            }
            let field_path = format!("{path}:{name}");
            field.config_type.check_definition(&field_path)?;
            if let Some(default) = &field.default {
                let probe = ConfigSchema::new(field.config_type.clone());
                if let Some(err) = process_config(&probe, default).errors().first() {
                    return Err(format!("default for {field_path} is invalid: {}", err.message));
                }
            }
        }
        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, Field)> for Shape {
    fn from_iter<I: IntoIterator<Item = (K, Field)>>(iter: I) -> Self {
        let mut shape = Shape::new();
        for (name, field) in iter {
            shape.insert(name.into(), field);
        }
        shape
    }
}

/// The configuration schema of a definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSchema(ConfigType);

impl ConfigSchema {
    pub fn new(config_type: ConfigType) -> Self {
        Self(config_type)
    }

    /// A shape with no fields: accepts only an empty or absent mapping.
    pub fn empty() -> Self {
        Self(ConfigType::Shape {
            fields: Shape::new(),
        })
    }

    pub fn shape<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Field)>,
        K: Into<String>,
    {
        Self(ConfigType::shape(fields))
    }

    /// `{"config": inner}`, with the empty schema standing in for `None`.
    pub fn config_envelope(inner: Option<&ConfigSchema>) -> Self {
        let inner = inner.cloned().unwrap_or_else(ConfigSchema::empty);
        Self(ConfigType::shape([(CONFIG_KEY, Field::new(inner.0))]))
    }

    pub fn config_type(&self) -> &ConfigType {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        matches!(&self.0, ConfigType::Shape { fields } if fields.is_empty())
    }

    /// Check the schema itself is well formed: unique field names, valid
    /// defaults, non-empty enums and selectors.
    pub fn check(&self) -> Result<(), DefinitionError> {
        self.0
            .check_definition("root")
            .map_err(DefinitionError::InvalidSchema)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<ConfigType> for ConfigSchema {
    fn from(config_type: ConfigType) -> Self {
        ConfigSchema::new(config_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_requiredness() {
        assert!(Field::new(ConfigType::Int).is_required());
        assert!(!Field::new(ConfigType::Int).with_default(json!(1)).is_required());
        assert!(!Field::new(ConfigType::noneable(ConfigType::Int)).is_required());
        assert!(!Field::new(ConfigType::Int).optional().is_required());
        let all_optional = ConfigType::shape([("a", Field::new(ConfigType::Int).optional())]);
        assert!(!Field::new(all_optional).is_required());
    }

    #[test]
    fn test_shape_preserves_declaration_order() {
        let shape = Shape::new()
            .field("zeta", ConfigType::Int)
            .field("alpha", ConfigType::String)
            .field("mid", ConfigType::Bool);
        let names: Vec<&str> = shape.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_redeclared_field_replaces_in_place() {
        let shape = Shape::new()
            .field("a", ConfigType::Int)
            .field("b", ConfigType::Int)
            .field("a", ConfigType::String);
        assert_eq!(shape.len(), 2);
        assert_eq!(shape.get("a").unwrap().config_type, ConfigType::String);
    }

    #[test]
    fn test_envelope_of_none_is_empty_shape() {
        let envelope = ConfigSchema::config_envelope(None);
        let ConfigType::Shape { fields } = envelope.config_type() else {
            panic!("envelope must be a shape");
        };
        let config = fields.get("config").expect("config field");
        assert_eq!(config.config_type, ConfigSchema::empty().config_type().clone());
        assert!(!config.is_required());
    }

    #[test]
    fn test_json_round_trip_of_declared_schema() {
        let json = r#"{"type": "shape", "fields": [
            {"name": "bucket_prefix", "schema": {"type": "string"}},
            {"name": "retries", "schema": {"type": "int"}, "default": 3},
            {"name": "mode", "schema": {"type": "enum", "values": ["fast", "safe"]}}
        ]}"#;
        let schema = ConfigSchema::from_json(json).expect("parse schema");
        let ConfigType::Shape { fields } = schema.config_type() else {
            panic!("expected shape");
        };
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get("retries").unwrap().default, Some(json!(3)));
        assert!(schema.check().is_ok());

        let reparsed = ConfigSchema::from_json(&schema.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, schema);
    }

    #[test]
    fn test_check_rejects_bad_default() {
        let schema = ConfigSchema::shape([(
            "n",
            Field::new(ConfigType::Int).with_default(json!("three")),
        )]);
        let err = schema.check().unwrap_err();
        assert!(matches!(err, DefinitionError::InvalidSchema(msg) if msg.contains("root:n")));
    }

    #[test]
    fn test_check_rejects_empty_enum_and_selector() {
        assert!(ConfigSchema::new(ConfigType::enumeration(Vec::<String>::new()))
            .check()
            .is_err());
        assert!(ConfigSchema::new(ConfigType::selector(Vec::<(String, Field)>::new()))
            .check()
            .is_err());
    }
}
