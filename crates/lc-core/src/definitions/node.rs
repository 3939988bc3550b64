//! Node invocations: aliased or tagged uses of ops and graphs.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::graph::GraphDefinition;
use super::op::OpDefinition;
use crate::configurable::Configurable;

/// A definition that can appear as a node of a graph.
#[derive(Debug, Clone)]
pub enum NodeDefinition {
    Op(Arc<OpDefinition>),
    Graph(Arc<GraphDefinition>),
}

impl NodeDefinition {
    pub fn name(&self) -> &str {
        match self {
            NodeDefinition::Op(op) => op.op_name(),
            NodeDefinition::Graph(graph) => graph.graph_name(),
        }
    }

    pub fn as_configurable(&self) -> &dyn Configurable {
        match self {
            NodeDefinition::Op(op) => op.as_ref(),
            NodeDefinition::Graph(graph) => graph.as_ref(),
        }
    }
}

impl From<OpDefinition> for NodeDefinition {
    fn from(op: OpDefinition) -> Self {
        NodeDefinition::Op(Arc::new(op))
    }
}

impl From<GraphDefinition> for NodeDefinition {
    fn from(graph: GraphDefinition) -> Self {
        NodeDefinition::Graph(Arc::new(graph))
    }
}

impl From<OpDefinition> for NodeInvocation {
    fn from(op: OpDefinition) -> Self {
        NodeInvocation::new(op)
    }
}

impl From<GraphDefinition> for NodeInvocation {
    fn from(graph: GraphDefinition) -> Self {
        NodeInvocation::new(graph)
    }
}

/// An intermediate artifact of `alias` / `tag`.
///
/// Carries a definition plus how it is used in a graph. It is not a
/// definition itself, so it cannot be configured; configure the definition
/// first, then alias or tag the result.
#[derive(Debug, Clone)]
pub struct NodeInvocation {
    definition: NodeDefinition,
    alias: Option<String>,
    tags: BTreeMap<String, String>,
}

impl NodeInvocation {
    pub fn new(definition: impl Into<NodeDefinition>) -> Self {
        Self {
            definition: definition.into(),
            alias: None,
            tags: BTreeMap::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Merge `tags` into the invocation's tags.
    pub fn tag(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags.extend(tags);
        self
    }

    pub fn definition(&self) -> &NodeDefinition {
        &self.definition
    }

    /// Name of the node in its graph: the alias, else the definition name.
    pub fn node_name(&self) -> &str {
        self.alias
            .as_deref()
            .unwrap_or_else(|| self.definition.name())
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }
}
