//! Resource definitions.

use lc_common::DefinitionKind;
use lc_schema::ConfigSchema;
use std::collections::BTreeSet;

use crate::configurable::{Configurable, ConfiguredCopy, ConfiguredLayer};
use crate::naming::NamingPolicy;

/// A resource: shared infrastructure (a client, a connection) handed to ops.
///
/// Resources are unnamed; a job binds them to keys.
#[derive(Debug, Clone, Default)]
pub struct ResourceDefinition {
    description: Option<String>,
    config_schema: Option<ConfigSchema>,
    required_resource_keys: BTreeSet<String>,
    version: Option<String>,
    configured: Option<ConfiguredLayer>,
}

impl ResourceDefinition {
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

    pub fn with_required_resource_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_resource_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn required_resource_keys(&self) -> &BTreeSet<String> {
        &self.required_resource_keys
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl Configurable for ResourceDefinition {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Resource
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
            required_resource_keys: self.required_resource_keys.clone(),
            version: self.version.clone(),
            configured: Some(copy.layer),
        }
    }
}
