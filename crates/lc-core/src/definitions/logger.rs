//! Logger definitions.

use lc_common::DefinitionKind;
use lc_schema::ConfigSchema;

use crate::configurable::{Configurable, ConfiguredCopy, ConfiguredLayer};
use crate::naming::NamingPolicy;

/// A logger a job can attach under a key. Unnamed, like resources.
#[derive(Debug, Clone, Default)]
pub struct LoggerDefinition {
    description: Option<String>,
    config_schema: Option<ConfigSchema>,
    configured: Option<ConfiguredLayer>,
}

impl LoggerDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_schema(mut self, schema: ConfigSchema) -> Self {
        self.config_schema = Some(schema);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Configurable for LoggerDefinition {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Logger
    }

    fn name(&self) -> Option<&str> {
        None
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
        NamingPolicy::Nameless
    }

    fn copy_for_configured(&self, copy: ConfiguredCopy) -> Self {
        Self {
            description: copy.description,
            config_schema: copy.config_schema,
            configured: Some(copy.layer),
        }
    }
}
