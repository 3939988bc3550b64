//! Layered config common types and errors.
//!
//! This crate provides foundational types shared across the layered config
//! crates:
//! - Configuration values and paths into them
//! - Validation results and structured validation errors
//! - Definition-time and mapping-time error types
//! - The user-code error boundary used around config mapping functions

pub mod boundary;
pub mod error;
pub mod validation;
pub mod value;

pub use boundary::{user_code_error_boundary, BoxError, UserCodeError};
pub use error::{
    ConfigMappingFunctionError, DefinitionError, DefinitionKind, Error, ErrorCategory, Result,
};
pub use validation::{ErrorReason, ValidationError, ValidationResult};
pub use value::{ConfigPath, ConfigValue, PathSegment};
