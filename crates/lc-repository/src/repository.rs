//! Repository definitions.

use lc_common::DefinitionError;
use lc_core::{Definition, JobDefinition};
use std::collections::BTreeMap;
use tracing::info;

use crate::category::DefinitionCategory;
use crate::data::{CachingRepositoryData, DefinitionSource, RepositoryData};

/// What a repository is assembled from.
#[derive(Debug)]
pub enum RepositorySource {
    /// A flat list of jobs, graphs, partition sets, schedules and sensors.
    List(Vec<Definition>),
    /// Category key (`jobs`, `pipelines`, `partition_sets`, `schedules`,
    /// `sensors`) to named, possibly lazy, definitions.
    Map(BTreeMap<String, BTreeMap<String, DefinitionSource>>),
    /// Caller-provided data, used as is.
    Custom(Box<dyn RepositoryData>),
}

impl From<Vec<Definition>> for RepositorySource {
    fn from(definitions: Vec<Definition>) -> Self {
        RepositorySource::List(definitions)
    }
}

/// A named collection of definitions.
#[derive(Debug)]
pub struct RepositoryDefinition {
    name: String,
    description: Option<String>,
    data: Box<dyn RepositoryData>,
}

impl RepositoryDefinition {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        source: RepositorySource,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        let data: Box<dyn RepositoryData> = match source {
            RepositorySource::List(definitions) => {
                Box::new(CachingRepositoryData::from_list(definitions)?)
            }
            RepositorySource::Map(map) => Box::new(CachingRepositoryData::from_map(map)?),
            RepositorySource::Custom(data) => data,
        };
        info!(
            repository = %name,
            jobs = data.names(DefinitionCategory::Jobs).len(),
            partition_sets = data.names(DefinitionCategory::PartitionSets).len(),
            schedules = data.names(DefinitionCategory::Schedules).len(),
            sensors = data.names(DefinitionCategory::Sensors).len(),
            "repository assembled"
        );
        Ok(Self {
            name,
            description,
            data,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn data(&self) -> &dyn RepositoryData {
        self.data.as_ref()
    }

    pub fn job_names(&self) -> Vec<String> {
        self.data.names(DefinitionCategory::Jobs)
    }

    pub fn has_job(&self, name: &str) -> bool {
        self.data.has(DefinitionCategory::Jobs, name)
    }

    /// Look up a job by name, loading it if it is lazy.
    pub fn get_job(&self, name: &str) -> Result<Option<&JobDefinition>, DefinitionError> {
        Ok(self
            .data
            .get(DefinitionCategory::Jobs, name)?
            .and_then(|definition| match definition {
                Definition::Job(job) => Some(job),
                _ => None,
            }))
    }

    pub fn get_all_jobs(&self) -> Result<Vec<&JobDefinition>, DefinitionError> {
        Ok(self
            .data
            .all(DefinitionCategory::Jobs)?
            .into_iter()
            .filter_map(|definition| match definition {
                Definition::Job(job) => Some(job),
                _ => None,
            })
            .collect())
    }

    /// Look up any definition by category and name.
    pub fn get(
        &self,
        category: DefinitionCategory,
        name: &str,
    ) -> Result<Option<&Definition>, DefinitionError> {
        self.data.get(category, name)
    }

    pub fn names(&self, category: DefinitionCategory) -> Vec<String> {
        self.data.names(category)
    }
}
