//! Configuration values and paths into them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque structured configuration value.
///
/// Values have no identity beyond structural equality. They are cloned when
/// handed from one layer to the next.
pub type ConfigValue = serde_json::Value;

/// Key under which a definition's own configuration lives.
pub const CONFIG_KEY: &str = "config";

/// An empty mapping.
pub fn empty_mapping() -> ConfigValue {
    ConfigValue::Object(serde_json::Map::new())
}

/// Wrap a value as `{"config": value}`.
pub fn config_envelope(value: ConfigValue) -> ConfigValue {
    let mut map = serde_json::Map::new();
    map.insert(CONFIG_KEY.to_string(), value);
    ConfigValue::Object(map)
}

/// Read the `config` entry of an envelope, or an empty mapping if absent.
///
/// A present `null` entry is returned as is.
pub fn config_entry(envelope: &ConfigValue) -> ConfigValue {
    envelope
        .get(CONFIG_KEY)
        .cloned()
        .unwrap_or_else(empty_mapping)
}

/// Human-readable name of a value's runtime type.
pub fn type_name(value: &ConfigValue) -> &'static str {
    match value {
        ConfigValue::Null => "null",
        ConfigValue::Bool(_) => "bool",
        ConfigValue::Number(n) if n.is_f64() => "float",
        ConfigValue::Number(_) => "int",
        ConfigValue::String(_) => "string",
        ConfigValue::Array(_) => "array",
        ConfigValue::Object(_) => "mapping",
    }
}

/// One step of a path into a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{key}"),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Location of a value inside a configuration tree, from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigPath(Vec<PathSegment>);

impl ConfigPath {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// A new path extended by a mapping key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// A new path extended by a sequence index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The last mapping key on the path, if any.
    pub fn last_key(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|segment| match segment {
            PathSegment::Key(key) => Some(key.as_str()),
            PathSegment::Index(_) => None,
        })
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) => write!(f, ":{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
