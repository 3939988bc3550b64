//! Repository data: indexed, optionally lazily loaded definitions.

use lc_common::DefinitionError;
use lc_core::{Definition, JobDefinition};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

use crate::category::{DefinitionCategory, VALID_CATEGORY_KEYS};

type Loader = dyn Fn() -> Definition + Send + Sync;

/// Source of the definitions a repository serves.
///
/// Implement this for full control over how definitions are built and
/// indexed.
pub trait RepositoryData: fmt::Debug + Send + Sync {
    /// Names of every definition in `category`, sorted. Never loads.
    fn names(&self, category: DefinitionCategory) -> Vec<String>;

    /// Look up a definition, loading it if needed.
    fn get(
        &self,
        category: DefinitionCategory,
        name: &str,
    ) -> Result<Option<&Definition>, DefinitionError>;

    fn has(&self, category: DefinitionCategory, name: &str) -> bool {
        self.names(category).iter().any(|n| n == name)
    }

    /// Every definition in `category`, loading all of them.
    fn all(&self, category: DefinitionCategory) -> Result<Vec<&Definition>, DefinitionError> {
        self.names(category)
            .iter()
            .filter_map(|name| self.get(category, name).transpose())
            .collect()
    }
}

/// A definition built on first access.
///
/// The loader runs at most once; its checked outcome, success or error, is
/// cached.
#[derive(Clone)]
pub struct LazyDefinition {
    loader: Arc<Loader>,
    cell: Arc<OnceLock<Result<Definition, DefinitionError>>>,
}

impl LazyDefinition {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Definition + Send + Sync + 'static,
    {
        Self {
            loader: Arc::new(loader),
            cell: Arc::new(OnceLock::new()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    fn load(
        &self,
        category: DefinitionCategory,
        name: &str,
    ) -> Result<&Definition, DefinitionError> {
        self.cell
            .get_or_init(|| {
                debug!(category = %category, name, "loading lazy definition");
                check_definition(category, name, (self.loader)())
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl fmt::Debug for LazyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyDefinition")
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

/// A definition, or a way to build one.
#[derive(Debug, Clone)]
pub enum DefinitionSource {
    Eager(Definition),
    Lazy(LazyDefinition),
}

impl DefinitionSource {
    pub fn lazy<F>(loader: F) -> Self
    where
        F: Fn() -> Definition + Send + Sync + 'static,
    {
        DefinitionSource::Lazy(LazyDefinition::new(loader))
    }

    fn load(
        &self,
        category: DefinitionCategory,
        name: &str,
    ) -> Result<&Definition, DefinitionError> {
        match self {
            DefinitionSource::Eager(definition) => Ok(definition),
            DefinitionSource::Lazy(lazy) => lazy.load(category, name),
        }
    }
}

impl From<Definition> for DefinitionSource {
    fn from(definition: Definition) -> Self {
        DefinitionSource::Eager(definition)
    }
}

/// The bundled [`RepositoryData`]: a per-category index of named sources.
#[derive(Debug, Default)]
pub struct CachingRepositoryData {
    index: BTreeMap<DefinitionCategory, BTreeMap<String, DefinitionSource>>,
}

impl CachingRepositoryData {
    /// Index a flat list of jobs, graphs, partition sets, schedules and
    /// sensors.
    pub fn from_list(definitions: Vec<Definition>) -> Result<Self, DefinitionError> {
        let bad: Vec<String> = definitions
            .iter()
            .enumerate()
            .filter(|(_, d)| DefinitionCategory::for_kind(d.kind()).is_none())
            .map(|(i, d)| format!("value of type {} at index {i}", d.kind()))
            .collect();
        if !bad.is_empty() {
            return Err(DefinitionError::InvalidRepository(format!(
                "all elements of a definition list must be of type JobDefinition, \
                 GraphDefinition, PartitionSetDefinition, ScheduleDefinition, or \
                 SensorDefinition. Got {}.",
                bad.join(", ")
            )));
        }

        let mut data = Self::default();
        for definition in definitions {
            let Some(category) = DefinitionCategory::for_kind(definition.kind()) else {
                continue;
            };
            let definition = graph_as_job(definition);
            let name = definition.name().unwrap_or_default().to_string();
            data.insert(category, name, DefinitionSource::Eager(definition))?;
        }
        data.check_job_references()?;
        Ok(data)
    }

    /// Index a category map, as in `{"jobs": {name: source}, ...}`.
    pub fn from_map(
        map: BTreeMap<String, BTreeMap<String, DefinitionSource>>,
    ) -> Result<Self, DefinitionError> {
        let bad_keys: Vec<String> = map
            .keys()
            .filter(|key| !VALID_CATEGORY_KEYS.contains(&key.as_str()))
            .map(|key| format!("'{key}'"))
            .collect();
        if !bad_keys.is_empty() {
            return Err(DefinitionError::InvalidRepository(format!(
                "a definition map must not contain keys other than {{{}}}: found {}",
                VALID_CATEGORY_KEYS
                    .iter()
                    .map(|key| format!("'{key}'"))
                    .collect::<Vec<_>>()
                    .join(", "),
                bad_keys.join(", ")
            )));
        }

        let mut data = Self::default();
        for (key, entries) in map {
            let category = key
                .parse::<DefinitionCategory>()
                .map_err(DefinitionError::InvalidRepository)?;
            for (name, source) in entries {
                let source = match source {
                    DefinitionSource::Eager(definition) => {
                        DefinitionSource::Eager(check_definition(category, &name, definition)?)
                    }
                    lazy @ DefinitionSource::Lazy(_) => lazy,
                };
                data.insert(category, name, source)?;
            }
        }
        Ok(data)
    }

    fn insert(
        &mut self,
        category: DefinitionCategory,
        name: String,
        source: DefinitionSource,
    ) -> Result<(), DefinitionError> {
        let entries = self.index.entry(category).or_default();
        if entries.contains_key(&name) {
            return Err(DefinitionError::DuplicateDefinition {
                category: category.to_string(),
                name,
            });
        }
        entries.insert(name, source);
        Ok(())
    }

    /// Every eager partition set, schedule and sensor must target a job
    /// this repository knows.
    fn check_job_references(&self) -> Result<(), DefinitionError> {
        for sources in self.index.values() {
            for source in sources.values() {
                let DefinitionSource::Eager(definition) = source else {
                    continue;
                };
                let target = match definition {
                    Definition::PartitionSet(d) => &d.job_name,
                    Definition::Schedule(d) => &d.job_name,
                    Definition::Sensor(d) => &d.job_name,
                    _ => continue,
                };
                if !self.has(DefinitionCategory::Jobs, target) {
                    return Err(DefinitionError::InvalidRepository(format!(
                        "{} \"{}\" targets job \"{target}\", which was not found in this repository",
                        definition.kind(),
                        definition.name().unwrap_or_default(),
                    )));
                }
            }
        }
        Ok(())
    }
}

impl RepositoryData for CachingRepositoryData {
    fn names(&self, category: DefinitionCategory) -> Vec<String> {
        self.index
            .get(&category)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn get(
        &self,
        category: DefinitionCategory,
        name: &str,
    ) -> Result<Option<&Definition>, DefinitionError> {
        self.index
            .get(&category)
            .and_then(|entries| entries.get(name))
            .map(|source| source.load(category, name))
            .transpose()
    }

    fn has(&self, category: DefinitionCategory, name: &str) -> bool {
        self.index
            .get(&category)
            .is_some_and(|entries| entries.contains_key(name))
    }
}

fn graph_as_job(definition: Definition) -> Definition {
    match definition {
        Definition::Graph(graph) => JobDefinition::from_graph(graph).into(),
        other => other,
    }
}

/// Check a definition filed under `category` / `name` really is one.
fn check_definition(
    category: DefinitionCategory,
    name: &str,
    definition: Definition,
) -> Result<Definition, DefinitionError> {
    if DefinitionCategory::for_kind(definition.kind()) != Some(category) {
        return Err(DefinitionError::InvalidRepository(format!(
            "object mapped to {category} \"{name}\" is a {}",
            definition.kind()
        )));
    }
    let definition = graph_as_job(definition);
    if definition.name() != Some(name) {
        return Err(DefinitionError::InvalidRepository(format!(
            "object mapped to {category} \"{name}\" has name \"{}\"",
            definition.name().unwrap_or("<unnamed>")
        )));
    }
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc_core::{GraphDefinition, OpDefinition, ResourceDefinition, ScheduleDefinition};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn etl() -> GraphDefinition {
        GraphDefinition::new("etl").with_node(OpDefinition::new("extract"))
    }

    #[test]
    fn test_list_reports_every_bad_element() {
        let err = CachingRepositoryData::from_list(vec![
            etl().into(),
            ResourceDefinition::new().into(),
            OpDefinition::new("extract").into(),
        ])
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("value of type ResourceDefinition at index 1"), "{msg}");
        assert!(msg.contains("value of type OpDefinition at index 2"), "{msg}");
        assert_eq!(err.code(), 15);
    }

    #[test]
    fn test_graph_indexed_as_job() {
        let data = CachingRepositoryData::from_list(vec![etl().into()]).unwrap();
        let job = data.get(DefinitionCategory::Jobs, "etl").unwrap().unwrap();
        assert!(matches!(job, Definition::Job(_)));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = CachingRepositoryData::from_list(vec![etl().into(), etl().into()]).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::DuplicateDefinition {
                category: "jobs".to_string(),
                name: "etl".to_string(),
            }
        );
    }

    #[test]
    fn test_schedule_must_target_known_job() {
        let err = CachingRepositoryData::from_list(vec![
            etl().into(),
            ScheduleDefinition::new("nightly", "missing", "0 22 * * *").into(),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("targets job \"missing\""));
    }

    #[test]
    fn test_lazy_loader_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut jobs = BTreeMap::new();
        jobs.insert(
            "etl".to_string(),
            DefinitionSource::lazy(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                etl().into()
            }),
        );
        let data =
            CachingRepositoryData::from_map(BTreeMap::from([("pipelines".to_string(), jobs)]))
                .unwrap();

        assert!(data.has(DefinitionCategory::Jobs, "etl"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(data.get(DefinitionCategory::Jobs, "etl").unwrap().is_some());
        assert!(data.get(DefinitionCategory::Jobs, "etl").unwrap().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lazy_loader_name_checked() {
        let jobs = BTreeMap::from([(
            "etl".to_string(),
            DefinitionSource::lazy(|| GraphDefinition::new("other").into()),
        )]);
        let data =
            CachingRepositoryData::from_map(BTreeMap::from([("jobs".to_string(), jobs)])).unwrap();
        let err = data.get(DefinitionCategory::Jobs, "etl").unwrap_err();
        assert!(err.to_string().contains("has name \"other\""));
        // The failed load is cached too.
        assert_eq!(data.get(DefinitionCategory::Jobs, "etl").unwrap_err(), err);
    }

    #[test]
    fn test_map_rejects_unknown_keys() {
        let err = CachingRepositoryData::from_map(BTreeMap::from([
            ("solids".to_string(), BTreeMap::new()),
            ("jobs".to_string(), BTreeMap::new()),
            ("modes".to_string(), BTreeMap::new()),
        ]))
        .unwrap_err();
        assert!(err.to_string().ends_with("found 'modes', 'solids'"));
    }

    #[test]
    fn test_missing_name_is_none() {
        let data = CachingRepositoryData::from_list(vec![etl().into()]).unwrap();
        assert!(data.get(DefinitionCategory::Sensors, "etl").unwrap().is_none());
        assert!(!data.has(DefinitionCategory::Jobs, "nope"));
        assert_eq!(data.names(DefinitionCategory::Jobs), vec!["etl".to_string()]);
    }
}
