//! Graph definitions: ops and nested graphs wired together.

use lc_common::DefinitionKind;
use lc_schema::ConfigSchema;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::node::{NodeDefinition, NodeInvocation};
use crate::configurable::{Configurable, ConfiguredCopy, ConfiguredLayer};
use crate::naming::NamingPolicy;

#[derive(Debug, Clone)]
pub struct GraphDefinition {
    name: String,
    description: Option<String>,
    config_schema: Option<ConfigSchema>,
    nodes: Vec<NodeInvocation>,
    configured: Option<ConfiguredLayer>,
}

impl GraphDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_schema: None,
            nodes: Vec::new(),
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

    pub fn with_node(mut self, node: impl Into<NodeInvocation>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn nodes(&self) -> &[NodeInvocation] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&NodeInvocation> {
        self.nodes.iter().find(|n| n.node_name() == name)
    }

    pub fn graph_name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self, alias: impl Into<String>) -> NodeInvocation {
        NodeInvocation::new(NodeDefinition::Graph(Arc::new(self.clone()))).alias(alias)
    }

    pub fn tag(&self, tags: BTreeMap<String, String>) -> NodeInvocation {
        NodeInvocation::new(NodeDefinition::Graph(Arc::new(self.clone()))).tag(tags)
    }
}

impl Configurable for GraphDefinition {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Graph
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
            nodes: self.nodes.clone(),
            configured: Some(copy.layer),
        }
    }
}
