//! Op definitions.

use lc_common::DefinitionKind;
use lc_schema::ConfigSchema;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::node::{NodeDefinition, NodeInvocation};
use crate::configurable::{Configurable, ConfiguredCopy, ConfiguredLayer};
use crate::naming::NamingPolicy;

/// A single unit of computation in a graph.
#[derive(Debug, Clone)]
pub struct OpDefinition {
    name: String,
    description: Option<String>,
    config_schema: Option<ConfigSchema>,
    inputs: Vec<String>,
    outputs: Vec<String>,
    required_resource_keys: BTreeSet<String>,
    tags: BTreeMap<String, String>,
    configured: Option<ConfiguredLayer>,
}

impl OpDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_schema: None,
            inputs: Vec::new(),
            outputs: vec!["result".to_string()],
            required_resource_keys: BTreeSet::new(),
            tags: BTreeMap::new(),
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

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
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

    pub fn with_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn op_name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn required_resource_keys(&self) -> &BTreeSet<String> {
        &self.required_resource_keys
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Use this op under another name. The result is no longer configurable.
    pub fn alias(&self, alias: impl Into<String>) -> NodeInvocation {
        NodeInvocation::new(NodeDefinition::Op(Arc::new(self.clone()))).alias(alias)
    }

    /// Use this op with extra tags. The result is no longer configurable.
    pub fn tag(&self, tags: BTreeMap<String, String>) -> NodeInvocation {
        NodeInvocation::new(NodeDefinition::Op(Arc::new(self.clone()))).tag(tags)
    }
}

impl Configurable for OpDefinition {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Op
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
        NamingPolicy::Require
    }

    fn copy_for_configured(&self, copy: ConfiguredCopy) -> Self {
        Self {
            name: copy.name.unwrap_or_else(|| self.name.clone()),
            description: copy.description,
            config_schema: copy.config_schema,
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            required_resource_keys: self.required_resource_keys.clone(),
            tags: self.tags.clone(),
            configured: Some(copy.layer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_produces_invocation() {
        let op = OpDefinition::new("return_n");
        let invocation = op.alias("return_n_again");
        assert_eq!(invocation.node_name(), "return_n_again");
        assert_eq!(invocation.definition().name(), "return_n");
    }

    #[test]
    fn test_tag_produces_invocation() {
        let op = OpDefinition::new("return_n");
        let tags = BTreeMap::from([("team".to_string(), "data".to_string())]);
        let invocation = op.tag(tags.clone());
        assert_eq!(invocation.node_name(), "return_n");
        assert_eq!(invocation.tags(), &tags);
    }
}
