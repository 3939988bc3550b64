//! `configure` over runtime-typed definitions.

use lc_common::DefinitionError;
use lc_schema::ConfigSchema;
use tracing::warn;

use crate::configurable::{ConfigOrFn, ConfigurableExt, ConfigureOptions};
use crate::definitions::Definition;

/// Wrap `definition` in a configured copy of the same kind.
///
/// Aliased or tagged nodes and non-configurable kinds are rejected before
/// anything else is looked at.
pub fn configure(
    definition: &Definition,
    config_or_fn: impl Into<ConfigOrFn>,
    config_schema: Option<ConfigSchema>,
    options: ConfigureOptions,
) -> Result<Definition, DefinitionError> {
    let mapping = config_or_fn.into();
    let configured: Definition = match definition {
        Definition::Invocation(invocation) => {
            warn!(node = invocation.node_name(), "configure called on a node invocation");
            return Err(DefinitionError::IntermediateNode);
        }
        Definition::Resource(d) => d.configured(mapping, config_schema, options)?.into(),
        Definition::Logger(d) => d.configured(mapping, config_schema, options)?.into(),
        Definition::Executor(d) => d.configured(mapping, config_schema, options)?.into(),
        Definition::Op(d) => d.configured(mapping, config_schema, options)?.into(),
        Definition::Graph(d) => d.configured(mapping, config_schema, options)?.into(),
        Definition::Job(_)
        | Definition::PartitionSet(_)
        | Definition::Schedule(_)
        | Definition::Sensor(_) => {
            return Err(DefinitionError::NotConfigurable {
                kind: definition.kind(),
            })
        }
    };
    Ok(configured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configurable::{ConfigMappingFn, Configurable};
    use crate::definitions::{OpDefinition, ScheduleDefinition};
    use lc_common::{ConfigValue, DefinitionKind};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_invocation_rejected_before_mapping_runs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mapping = ConfigMappingFn::named("dev", move |cfg: &ConfigValue| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(cfg.clone())
        });
        let aliased = Definition::from(OpDefinition::new("return_n").alias("n2"));
        let err = configure(&aliased, mapping, None, ConfigureOptions::default()).unwrap_err();
        assert_eq!(err, DefinitionError::IntermediateNode);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_non_configurable_kind_rejected() {
        let schedule = Definition::from(ScheduleDefinition::new("daily", "job", "0 0 * * *"));
        let err = configure(&schedule, json!({}), None, ConfigureOptions::named("x")).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::NotConfigurable {
                kind: DefinitionKind::Schedule
            }
        );
    }

    #[test]
    fn test_configure_keeps_kind() {
        let op = Definition::from(OpDefinition::new("return_n"));
        let configured =
            configure(&op, json!({"n": 1}), None, ConfigureOptions::named("return_one")).unwrap();
        assert_eq!(configured.kind(), DefinitionKind::Op);
        assert_eq!(configured.name(), Some("return_one"));
        let capability = configured.as_configurable().unwrap();
        assert!(capability.is_preconfigured());
        let inner = &capability.configured_layer().unwrap().inner;
        assert_eq!(inner.name(), Some("return_n"));
        assert!(!inner.is_preconfigured());
    }
}
