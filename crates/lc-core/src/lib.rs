//! Layered config core.
//!
//! This crate provides:
//! - The [`Configurable`] capability and the `configured` wrapping operation
//! - Concrete definition kinds (resources, loggers, executors, ops, graphs)
//! - Naming rules for configured definitions
//! - The [`Composer`], which resolves a configured definition layer by layer
//! - Resolution traces for auditing a resolution

pub mod composer;
pub mod configurable;
pub mod configure;
pub mod definitions;
pub mod naming;
pub mod trace;

pub use composer::{resolve, Composer, ComposerOptions};
pub use configurable::{
    ConfigMappingFn, ConfigOrFn, Configurable, ConfigurableExt, ConfigureOptions, ConfiguredCopy,
    ConfiguredLayer,
};
pub use configure::configure;
pub use definitions::{
    Definition, ExecutorDefinition, GraphDefinition, JobDefinition, LoggerDefinition,
    NodeDefinition, NodeInvocation, OpDefinition, PartitionSetDefinition, ResourceDefinition,
    ScheduleDefinition, SensorDefinition,
};
pub use naming::NamingPolicy;
pub use trace::{LayerOutcome, LayerRecord, ResolutionTrace, TracedResolution};
