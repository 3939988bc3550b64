//! Executor definitions.

use lc_common::DefinitionKind;
use lc_schema::ConfigSchema;
use serde::{Deserialize, Serialize};

use crate::configurable::{Configurable, ConfiguredCopy, ConfiguredLayer};
use crate::naming::NamingPolicy;

/// What an executor needs from the job it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorRequirement {
    /// Op outputs must be persisted between steps.
    PersistentOutputs,
    /// The job must be reconstructable in another process.
    ReconstructableJob,
}

/// An executor. Configured copies keep the executor's name unless renamed.
#[derive(Debug, Clone)]
pub struct ExecutorDefinition {
    name: String,
    description: Option<String>,
    config_schema: Option<ConfigSchema>,
    requirements: Vec<ExecutorRequirement>,
    configured: Option<ConfiguredLayer>,
}

impl ExecutorDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_schema: None,
            requirements: Vec::new(),
            configured: None,
        }
    }

    pub fn with_config_schema(mut self, schema: ConfigSchema) -> Self {
        self.config_schema = Some(schema);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_requirements(mut self, requirements: Vec<ExecutorRequirement>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn requirements(&self) -> &[ExecutorRequirement] {
        &self.requirements
    }
}

impl Configurable for ExecutorDefinition {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Executor
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn config_schema(&self) -> Option<&ConfigSchema> {
        self.config_schema.as_ref()
    }

    fn configured_layer(&self) -> Option<&ConfiguredLayer> {
        self.configured.as_ref()
    }

    fn naming_policy(&self) -> NamingPolicy {
        NamingPolicy::Inherit
    }

    fn copy_for_configured(&self, copy: ConfiguredCopy) -> Self {
        Self {
            name: copy.name.unwrap_or_else(|| self.name.clone()),
            description: copy.description,
            config_schema: copy.config_schema,
            requirements: self.requirements.clone(),
            configured: Some(copy.layer),
        }
    }
}
