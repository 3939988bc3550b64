//! Concrete definition kinds.
//!
//! Each configurable kind implements [`Configurable`] on its own; they share
//! no base state. [`Definition`] is the runtime-typed union used where
//! definitions of mixed kinds travel together.

pub mod executor;
pub mod graph;
pub mod job;
pub mod logger;
pub mod node;
pub mod op;
pub mod resource;

pub use executor::{ExecutorDefinition, ExecutorRequirement};
pub use graph::GraphDefinition;
pub use job::{JobDefinition, PartitionSetDefinition, ScheduleDefinition, SensorDefinition};
pub use logger::LoggerDefinition;
pub use node::{NodeDefinition, NodeInvocation};
pub use op::OpDefinition;
pub use resource::ResourceDefinition;

use lc_common::DefinitionKind;

use crate::configurable::Configurable;

/// Any definition object.
#[derive(Debug, Clone)]
pub enum Definition {
    Resource(ResourceDefinition),
    Logger(LoggerDefinition),
    Executor(ExecutorDefinition),
    Op(OpDefinition),
    Graph(GraphDefinition),
    Invocation(NodeInvocation),
    Job(JobDefinition),
    PartitionSet(PartitionSetDefinition),
    Schedule(ScheduleDefinition),
    Sensor(SensorDefinition),
}

impl Definition {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Definition::Resource(_) => DefinitionKind::Resource,
            Definition::Logger(_) => DefinitionKind::Logger,
            Definition::Executor(_) => DefinitionKind::Executor,
            Definition::Op(_) => DefinitionKind::Op,
            Definition::Graph(_) => DefinitionKind::Graph,
            Definition::Invocation(_) => DefinitionKind::Invocation,
            Definition::Job(_) => DefinitionKind::Job,
            Definition::PartitionSet(_) => DefinitionKind::PartitionSet,
            Definition::Schedule(_) => DefinitionKind::Schedule,
            Definition::Sensor(_) => DefinitionKind::Sensor,
        }
    }

    /// The definition's name; `None` for unnamed kinds.
    pub fn name(&self) -> Option<&str> {
        match self {
            Definition::Resource(_) | Definition::Logger(_) => None,
            Definition::Executor(d) => d.name(),
            Definition::Op(d) => d.name(),
            Definition::Graph(d) => d.name(),
            Definition::Invocation(d) => Some(d.node_name()),
            Definition::Job(d) => Some(d.name()),
            Definition::PartitionSet(d) => Some(&d.name),
            Definition::Schedule(d) => Some(&d.name),
            Definition::Sensor(d) => Some(&d.name),
        }
    }

    /// View as a configurable definition, if this kind is one.
    pub fn as_configurable(&self) -> Option<&dyn Configurable> {
        match self {
            Definition::Resource(d) => Some(d),
            Definition::Logger(d) => Some(d),
            Definition::Executor(d) => Some(d),
            Definition::Op(d) => Some(d),
            Definition::Graph(d) => Some(d),
            Definition::Invocation(_)
            | Definition::Job(_)
            | Definition::PartitionSet(_)
            | Definition::Schedule(_)
            | Definition::Sensor(_) => None,
        }
    }
}

macro_rules! impl_from_definition {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Definition {
                fn from(definition: $ty) -> Self {
                    Definition::$variant(definition)
                }
            }
        )*
    };
}

impl_from_definition! {
    Resource => ResourceDefinition,
    Logger => LoggerDefinition,
    Executor => ExecutorDefinition,
    Op => OpDefinition,
    Graph => GraphDefinition,
    Invocation => NodeInvocation,
    Job => JobDefinition,
    PartitionSet => PartitionSetDefinition,
    Schedule => ScheduleDefinition,
    Sensor => SensorDefinition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_configurable_kinds_expose_capability() {
        let definitions: Vec<Definition> = vec![
            ResourceDefinition::new().into(),
            LoggerDefinition::new().into(),
            ExecutorDefinition::new("in_process").into(),
            OpDefinition::new("op").into(),
            GraphDefinition::new("graph").into(),
            OpDefinition::new("op").alias("aliased").into(),
            JobDefinition::from_graph(GraphDefinition::new("job")).into(),
            PartitionSetDefinition::new("parts", "job", vec!["a".to_string()]).into(),
            ScheduleDefinition::new("daily", "job", "0 0 * * *").into(),
            SensorDefinition::new("watch", "job").into(),
        ];
        for definition in &definitions {
            assert_eq!(
                definition.as_configurable().is_some(),
                definition.kind().is_configurable(),
                "{:?}",
                definition.kind()
            );
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(Definition::from(ResourceDefinition::new()).name(), None);
        assert_eq!(
            Definition::from(OpDefinition::new("op").alias("aliased")).name(),
            Some("aliased")
        );
        assert_eq!(
            Definition::from(ScheduleDefinition::new("daily", "job", "0 0 * * *")).name(),
            Some("daily")
        );
    }
}
