//! Jobs: a graph bound to resources, loggers, and an executor.

use std::collections::BTreeMap;

use super::executor::ExecutorDefinition;
use super::graph::GraphDefinition;
use super::logger::LoggerDefinition;
use super::resource::ResourceDefinition;
use crate::configurable::Configurable;

/// A graph plus everything needed to run it. Not configurable itself; its
/// parts are.
#[derive(Debug, Clone)]
pub struct JobDefinition {
    name: String,
    description: Option<String>,
    graph: GraphDefinition,
    resources: BTreeMap<String, ResourceDefinition>,
    loggers: BTreeMap<String, LoggerDefinition>,
    executor: Option<ExecutorDefinition>,
}

impl JobDefinition {
    pub fn new(name: impl Into<String>, graph: GraphDefinition) -> Self {
        Self {
            name: name.into(),
            description: None,
            graph,
            resources: BTreeMap::new(),
            loggers: BTreeMap::new(),
            executor: None,
        }
    }

    /// A job named after its graph.
    pub fn from_graph(graph: GraphDefinition) -> Self {
        let name = graph.graph_name().to_string();
        let description = graph.description().map(str::to_string);
        let mut job = Self::new(name, graph);
        job.description = description;
        job
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_resource(mut self, key: impl Into<String>, resource: ResourceDefinition) -> Self {
        self.resources.insert(key.into(), resource);
        self
    }

    pub fn with_logger(mut self, key: impl Into<String>, logger: LoggerDefinition) -> Self {
        self.loggers.insert(key.into(), logger);
        self
    }

    pub fn with_executor(mut self, executor: ExecutorDefinition) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn graph(&self) -> &GraphDefinition {
        &self.graph
    }

    pub fn resources(&self) -> &BTreeMap<String, ResourceDefinition> {
        &self.resources
    }

    pub fn loggers(&self) -> &BTreeMap<String, LoggerDefinition> {
        &self.loggers
    }

    pub fn executor(&self) -> Option<&ExecutorDefinition> {
        self.executor.as_ref()
    }
}

/// Runs a job on a cron schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDefinition {
    pub name: String,
    pub job_name: String,
    pub cron_schedule: String,
}

impl ScheduleDefinition {
    pub fn new(
        name: impl Into<String>,
        job_name: impl Into<String>,
        cron_schedule: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            job_name: job_name.into(),
            cron_schedule: cron_schedule.into(),
        }
    }
}

/// Triggers a job when an external condition is observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorDefinition {
    pub name: String,
    pub job_name: String,
    pub minimum_interval_seconds: Option<u64>,
}

impl SensorDefinition {
    pub fn new(name: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            job_name: job_name.into(),
            minimum_interval_seconds: None,
        }
    }
}

/// A named set of partitions of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSetDefinition {
    pub name: String,
    pub job_name: String,
    pub partitions: Vec<String>,
}

impl PartitionSetDefinition {
    pub fn new(
        name: impl Into<String>,
        job_name: impl Into<String>,
        partitions: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            job_name: job_name.into(),
            partitions,
        }
    }
}
