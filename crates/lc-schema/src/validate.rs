//! Structural schema validation.
//!
//! Errors are collected rather than returned at the first problem. Their
//! order is deterministic: depth first, shape fields in declaration order,
//! then undeclared keys in sorted order, array elements by index.

use lc_common::value::type_name;
use lc_common::{ConfigPath, ConfigValue, ErrorReason, ValidationError, ValidationResult};
use serde_json::Map;
use tracing::trace;

use crate::schema::{ConfigSchema, ConfigType, Shape};

/// Validates a configuration value against a schema.
///
/// On success the returned value is the processed configuration, with
/// defaults filled in.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, schema: &ConfigSchema, config: &ConfigValue) -> ValidationResult;
}

/// The bundled validator, driven purely by the schema's structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl SchemaValidator for StructuralValidator {
    fn validate(&self, schema: &ConfigSchema, config: &ConfigValue) -> ValidationResult {
        let mut errors = Vec::new();
        let value = evaluate(schema.config_type(), config, &ConfigPath::root(), &mut errors);
        trace!(errors = errors.len(), "config processed");
        ValidationResult::from_parts(value, errors)
    }
}

/// Validate and process `config` against `schema` with [`StructuralValidator`].
pub fn process_config(schema: &ConfigSchema, config: &ConfigValue) -> ValidationResult {
    StructuralValidator.validate(schema, config)
}

fn evaluate(
    ty: &ConfigType,
    value: &ConfigValue,
    path: &ConfigPath,
    errors: &mut Vec<ValidationError>,
) -> ConfigValue {
    match ty {
        ConfigType::Any => value.clone(),
        ConfigType::Bool => scalar(ty, value, value.is_boolean(), path, errors),
        ConfigType::Int => scalar(ty, value, value.is_i64() || value.is_u64(), path, errors),
        ConfigType::Float => scalar(ty, value, value.is_number(), path, errors),
        ConfigType::String => scalar(ty, value, value.is_string(), path, errors),
        ConfigType::Noneable { of } => {
            if value.is_null() {
                ConfigValue::Null
            } else {
                evaluate(of, value, path, errors)
            }
        }
        ConfigType::Array { of } => match value {
            ConfigValue::Array(items) => ConfigValue::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| evaluate(of, item, &path.index(i), errors))
                    .collect(),
            ),
            _ => mismatch(ty, value, path, errors),
        },
        ConfigType::Enum { values } => match value {
            ConfigValue::String(s) if values.iter().any(|v| v == s) => value.clone(),
            ConfigValue::String(s) => {
                errors.push(ValidationError::new(
                    ErrorReason::InvalidEnumValue,
                    path.clone(),
                    format!(
                        "Value \"{s}\" at path {path} is not one of the allowed values: {}",
                        values.join(", ")
                    ),
                ));
                value.clone()
            }
            _ => mismatch(ty, value, path, errors),
        },
        ConfigType::Map { of } => match value {
            ConfigValue::Object(entries) => {
                let mut out = Map::new();
                for key in sorted_keys(entries) {
                    let processed = evaluate(of, &entries[key], &path.key(key), errors);
                    out.insert(key.clone(), processed);
                }
                ConfigValue::Object(out)
            }
            _ => mismatch(ty, value, path, errors),
        },
        ConfigType::Shape { fields } => evaluate_shape(ty, fields, false, value, path, errors),
        ConfigType::Permissive { fields } => evaluate_shape(ty, fields, true, value, path, errors),
        ConfigType::Selector { fields } => evaluate_selector(ty, fields, value, path, errors),
    }
}

fn scalar(
    ty: &ConfigType,
    value: &ConfigValue,
    ok: bool,
    path: &ConfigPath,
    errors: &mut Vec<ValidationError>,
) -> ConfigValue {
    if ok {
        value.clone()
    } else {
        mismatch(ty, value, path, errors)
    }
}

fn mismatch(
    ty: &ConfigType,
    value: &ConfigValue,
    path: &ConfigPath,
    errors: &mut Vec<ValidationError>,
) -> ConfigValue {
    errors.push(ValidationError::new(
        ErrorReason::RuntimeTypeMismatch,
        path.clone(),
        format!(
            "Invalid value at path {path}. Value {value} of type \"{}\" is not valid for expected type \"{ty}\".",
            type_name(value)
        ),
    ));
    value.clone()
}

fn sorted_keys(entries: &Map<String, ConfigValue>) -> Vec<&String> {
    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort();
    keys
}

fn evaluate_shape(
    ty: &ConfigType,
    fields: &Shape,
    permissive: bool,
    value: &ConfigValue,
    path: &ConfigPath,
    errors: &mut Vec<ValidationError>,
) -> ConfigValue {
    let empty = Map::new();
    let entries = match value {
        ConfigValue::Object(entries) => entries,
        ConfigValue::Null if !fields.has_required_fields() => &empty,
        _ => return mismatch(ty, value, path, errors),
    };

    let mut out = Map::new();
    for (name, field) in fields.iter() {
        let field_path = path.key(name);
        match entries.get(name) {
            Some(field_value) => {
                let processed = evaluate(&field.config_type, field_value, &field_path, errors);
                out.insert(name.to_string(), processed);
            }
            None => {
                if let Some(default) = &field.default {
                    let processed = evaluate(&field.config_type, default, &field_path, errors);
                    out.insert(name.to_string(), processed);
                } else if field.config_type.is_noneable() {
                    out.insert(name.to_string(), ConfigValue::Null);
                } else if field.config_type.all_fields_optional() {
                    let processed =
                        evaluate(&field.config_type, &ConfigValue::Null, &field_path, errors);
                    out.insert(name.to_string(), processed);
                } else if field.is_required() {
                    errors.push(ValidationError::new(
                        ErrorReason::MissingRequiredField,
                        path.clone(),
                        format!(
                            "Missing required config entry \"{name}\" at path {path} (expected type \"{}\").",
                            field.config_type
                        ),
                    ));
                }
            }
        }
    }

    for key in sorted_keys(entries) {
        if fields.contains(key) {
            continue;
        }
        if permissive {
            out.insert(key.clone(), entries[key].clone());
        } else {
            errors.push(ValidationError::new(
                ErrorReason::FieldNotDefined,
                path.clone(),
                format!(
                    "Received unexpected config entry \"{key}\" at path {path}. Expected: [{}].",
                    fields.names().collect::<Vec<_>>().join(", ")
                ),
            ));
        }
    }

    ConfigValue::Object(out)
}

fn evaluate_selector(
    ty: &ConfigType,
    fields: &Shape,
    value: &ConfigValue,
    path: &ConfigPath,
    errors: &mut Vec<ValidationError>,
) -> ConfigValue {
    let ConfigValue::Object(entries) = value else {
        return mismatch(ty, value, path, errors);
    };

    let options = || fields.names().collect::<Vec<_>>().join(", ");
    if entries.len() != 1 {
        errors.push(ValidationError::new(
            ErrorReason::SelectorFieldError,
            path.clone(),
            format!(
                "Must specify exactly one config entry at path {path} (got {}). Options: [{}].",
                entries.len(),
                options()
            ),
        ));
        return value.clone();
    }

    let Some((key, selected)) = entries.iter().next() else {
        return value.clone();
    };
    match fields.get(key) {
        Some(field) => {
            let processed = evaluate(&field.config_type, selected, &path.key(key), errors);
            let mut out = Map::new();
            out.insert(key.clone(), processed);
            ConfigValue::Object(out)
        }
        None => {
            errors.push(ValidationError::new(
                ErrorReason::FieldNotDefined,
                path.clone(),
                format!(
                    "Received unexpected config entry \"{key}\" at path {path}. Options: [{}].",
                    options()
                ),
            ));
            value.clone()
        }
    }
}
