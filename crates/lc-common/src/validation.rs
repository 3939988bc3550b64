//! Validation results and structured validation errors.
//!
//! A failed validation is data, not an error: every problem found at one
//! layer is collected into [`ValidationResult::Failure`] so callers can
//! report them together.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::{ConfigPath, ConfigValue};

/// Why a value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    /// The value has the wrong runtime type for its schema.
    RuntimeTypeMismatch,
    /// A required field is absent.
    MissingRequiredField,
    /// A field is present that the schema does not declare.
    FieldNotDefined,
    /// A selector did not receive exactly one of its fields.
    SelectorFieldError,
    /// A string is not one of the declared enum values.
    InvalidEnumValue,
    /// The wrap chain is deeper than the composer allows.
    RecursionLimit,
}

impl ErrorReason {
    /// Stable error code (30-39 block).
    pub fn code(&self) -> u32 {
        match self {
            ErrorReason::RuntimeTypeMismatch => 30,
            ErrorReason::MissingRequiredField => 31,
            ErrorReason::FieldNotDefined => 32,
            ErrorReason::SelectorFieldError => 33,
            ErrorReason::InvalidEnumValue => 34,
            ErrorReason::RecursionLimit => 35,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorReason::RuntimeTypeMismatch => "runtime_type_mismatch",
            ErrorReason::MissingRequiredField => "missing_required_field",
            ErrorReason::FieldNotDefined => "field_not_defined",
            ErrorReason::SelectorFieldError => "selector_field_error",
            ErrorReason::InvalidEnumValue => "invalid_enum_value",
            ErrorReason::RecursionLimit => "recursion_limit",
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single structured validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub reason: ErrorReason,
    pub path: ConfigPath,
    pub message: String,
}

impl ValidationError {
    pub fn new(reason: ErrorReason, path: ConfigPath, message: impl Into<String>) -> Self {
        Self {
            reason,
            path,
            message: message.into(),
        }
    }

    pub fn code(&self) -> u32 {
        self.reason.code()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.reason, self.path, self.message)
    }
}

/// Outcome of validating or resolving a configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum ValidationResult {
    Success(ConfigValue),
    Failure(Vec<ValidationError>),
}

impl ValidationResult {
    pub fn success(value: ConfigValue) -> Self {
        ValidationResult::Success(value)
    }

    pub fn failure(errors: Vec<ValidationError>) -> Self {
        ValidationResult::Failure(errors)
    }

    /// Success if `errors` is empty, failure otherwise.
    pub fn from_parts(value: ConfigValue, errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            ValidationResult::Success(value)
        } else {
            ValidationResult::Failure(errors)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success(_))
    }

    pub fn value(&self) -> Option<&ConfigValue> {
        match self {
            ValidationResult::Success(value) => Some(value),
            ValidationResult::Failure(_) => None,
        }
    }

    /// Errors of a failure; empty on success.
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ValidationResult::Success(_) => &[],
            ValidationResult::Failure(errors) => errors,
        }
    }

    pub fn into_result(self) -> Result<ConfigValue, Vec<ValidationError>> {
        match self {
            ValidationResult::Success(value) => Ok(value),
            ValidationResult::Failure(errors) => Err(errors),
        }
    }

    /// Chain a fallible step onto a success; failures pass through untouched.
    pub fn and_then<E>(
        self,
        f: impl FnOnce(ConfigValue) -> Result<ValidationResult, E>,
    ) -> Result<ValidationResult, E> {
        match self {
            ValidationResult::Success(value) => f(value),
            failure @ ValidationResult::Failure(_) => Ok(failure),
        }
    }
}
