//! Error types for layered config.
//!
//! Errors carry stable codes grouped by category:
//! - 10-19: Definition errors (misuse at wrap time)
//! - 20-29: Config mapping function errors (user code failed during resolution)
//! - 30-39: Validation errors (see [`crate::ErrorReason`])
//! - 60-69: Serialization errors
//!
//! Validation failures are normally returned as data inside
//! [`crate::ValidationResult`]; [`Error::Validation`] exists for callers that
//! want to fold them into a single error channel.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::boundary::{BoxError, UserCodeError};
use crate::validation::ValidationError;

/// Result type alias for layered config operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Kinds of definition objects known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Resource,
    Logger,
    Executor,
    Op,
    Graph,
    /// An aliased or tagged use of an op or graph.
    Invocation,
    Job,
    PartitionSet,
    Schedule,
    Sensor,
}

impl DefinitionKind {
    /// Kinds that support `configured`.
    pub const CONFIGURABLE: &'static [DefinitionKind] = &[
        DefinitionKind::Resource,
        DefinitionKind::Logger,
        DefinitionKind::Executor,
        DefinitionKind::Op,
        DefinitionKind::Graph,
    ];

    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            DefinitionKind::Resource => "ResourceDefinition",
            DefinitionKind::Logger => "LoggerDefinition",
            DefinitionKind::Executor => "ExecutorDefinition",
            DefinitionKind::Op => "OpDefinition",
            DefinitionKind::Graph => "GraphDefinition",
            DefinitionKind::Invocation => "NodeInvocation",
            DefinitionKind::Job => "JobDefinition",
            DefinitionKind::PartitionSet => "PartitionSetDefinition",
            DefinitionKind::Schedule => "ScheduleDefinition",
            DefinitionKind::Sensor => "SensorDefinition",
        }
    }

    pub fn is_configurable(&self) -> bool {
        Self::CONFIGURABLE.contains(self)
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

fn configurable_kinds() -> String {
    DefinitionKind::CONFIGURABLE
        .iter()
        .map(|k| k.type_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Misuse detected while building definitions. Always fatal, never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error(
        "You have invoked `configured` on a NodeInvocation (an intermediate type), which is \
         produced by aliasing or tagging an op or graph definition. To configure it, call \
         `configured` on the definition object *before* using the `alias` or `tag` methods."
    )]
    IntermediateNode,

    #[error(
        "Only the following types can be used with `configured`: {}. Got {kind}.",
        configurable_kinds()
    )]
    NotConfigurable { kind: DefinitionKind },

    #[error("When non-callable config is given, config_schema must be None")]
    StaticConfigWithSchema,

    #[error(
        "Missing string param \"name\" while attempting to configure the node \"{node}\". When \
         configuring a node, you must specify a name for the resulting node definition, either \
         explicitly or through a named config mapping function."
    )]
    MissingName { node: String },

    #[error("{kind} is unnamed and cannot be configured with name \"{name}\"")]
    NameNotSupported { kind: DefinitionKind, name: String },

    #[error("invalid repository: {0}")]
    InvalidRepository(String),

    #[error("duplicate {category} definition \"{name}\"")]
    DuplicateDefinition { category: String, name: String },

    #[error("invalid config schema: {0}")]
    InvalidSchema(String),
}

impl DefinitionError {
    pub fn code(&self) -> u32 {
        match self {
            DefinitionError::IntermediateNode => 10,
            DefinitionError::NotConfigurable { .. } => 11,
            DefinitionError::StaticConfigWithSchema => 12,
            DefinitionError::MissingName { .. } => 13,
            DefinitionError::NameNotSupported { .. } => 14,
            DefinitionError::InvalidRepository(_) => 15,
            DefinitionError::DuplicateDefinition { .. } => 16,
            DefinitionError::InvalidSchema(_) => 17,
        }
    }
}

/// A user config mapping function failed during resolution.
///
/// Attributed to the entity whose layer ran the function, never to the
/// entity it wraps.
#[derive(Error, Debug)]
#[error(
    "{message} (entity: {}, wrapping: {}, layer: {depth})",
    display_name(.entity),
    display_name(.inner)
)]
pub struct ConfigMappingFunctionError {
    /// Kind of the configured entity.
    pub kind: DefinitionKind,
    /// Name of the configured entity whose mapping function failed.
    pub entity: Option<String>,
    /// Name of the entity that layer wraps.
    pub inner: Option<String>,
    /// Position of the failing layer in the chain; the outermost is 0.
    pub depth: usize,
    pub message: String,
    pub panicked: bool,
    #[source]
    pub source: BoxError,
}

fn display_name(name: &Option<String>) -> &str {
    name.as_deref().unwrap_or("<unnamed>")
}

impl ConfigMappingFunctionError {
    /// Attach entity identity to a failure caught at the user-code boundary.
    pub fn from_user_code(
        kind: DefinitionKind,
        entity: Option<String>,
        inner: Option<String>,
        depth: usize,
        err: UserCodeError,
    ) -> Self {
        Self {
            kind,
            entity,
            inner,
            depth,
            message: err.message,
            panicked: err.panicked,
            source: err.source,
        }
    }

    pub fn code(&self) -> u32 {
        20
    }
}

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Definition,
    ConfigMapping,
    Validation,
    Repository,
    Serialization,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Definition => write!(f, "definition"),
            ErrorCategory::ConfigMapping => write!(f, "config_mapping"),
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Repository => write!(f, "repository"),
            ErrorCategory::Serialization => write!(f, "serialization"),
        }
    }
}

/// Unified error type for layered config.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    ConfigMapping(#[from] ConfigMappingFunctionError),

    #[error("config validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn code(&self) -> u32 {
        match self {
            Error::Definition(err) => err.code(),
            Error::ConfigMapping(err) => err.code(),
            Error::Validation(errors) => errors.first().map(|e| e.code()).unwrap_or(30),
            Error::Json(_) => 60,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Definition(
                DefinitionError::InvalidRepository(_) | DefinitionError::DuplicateDefinition { .. },
            ) => ErrorCategory::Repository,
            Error::Definition(_) => ErrorCategory::Definition,
            Error::ConfigMapping(_) => ErrorCategory::ConfigMapping,
            Error::Validation(_) => ErrorCategory::Validation,
            Error::Json(_) => ErrorCategory::Serialization,
        }
    }

    /// Whether supplying different input could make the call succeed.
    ///
    /// Definition and mapping errors are programming mistakes.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Json(_))
    }
}

impl From<Vec<ValidationError>> for Error {
    fn from(errors: Vec<ValidationError>) -> Self {
        Error::Validation(errors)
    }
}
