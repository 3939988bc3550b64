//! Name resolution for configured definitions.

use lc_common::DefinitionError;

use crate::configurable::{ConfigOrFn, Configurable};

/// How a definition kind names its configured copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingPolicy {
    /// The kind has no name; supplying one is an error.
    Nameless,
    /// Explicit name, else the wrapped definition's name.
    Inherit,
    /// Explicit name, else the mapping function's identifier, else an error.
    Require,
}

/// Resolve the name of a configured copy of `definition`.
pub fn configured_name<C>(
    definition: &C,
    explicit: Option<&str>,
    mapping: &ConfigOrFn,
) -> Result<Option<String>, DefinitionError>
where
    C: Configurable + ?Sized,
{
    match definition.naming_policy() {
        NamingPolicy::Nameless => match explicit {
            Some(name) => Err(DefinitionError::NameNotSupported {
                kind: definition.kind(),
                name: name.to_string(),
            }),
            None => Ok(None),
        },
        NamingPolicy::Inherit => Ok(explicit
            .or_else(|| definition.name())
            .map(str::to_string)),
        NamingPolicy::Require => explicit
            .or_else(|| mapping.fn_name())
            .map(|name| Some(name.to_string()))
            .ok_or_else(|| DefinitionError::MissingName {
                node: definition.name().unwrap_or("<unnamed>").to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configurable::ConfigMappingFn;
    use crate::definitions::{ExecutorDefinition, OpDefinition, ResourceDefinition};
    use lc_common::{ConfigValue, DefinitionKind};
    use serde_json::json;

    fn named_fn() -> ConfigOrFn {
        ConfigMappingFn::named("dev_config", |cfg: &ConfigValue| Ok(cfg.clone())).into()
    }

    #[test]
    fn test_require_prefers_explicit_then_fn_name() {
        let op = OpDefinition::new("return_n");
        assert_eq!(
            configured_name(&op, Some("explicit"), &named_fn()).unwrap(),
            Some("explicit".to_string())
        );
        assert_eq!(
            configured_name(&op, None, &named_fn()).unwrap(),
            Some("dev_config".to_string())
        );
    }

    #[test]
    fn test_require_without_any_name_names_the_node() {
        let op = OpDefinition::new("return_n");
        let err = configured_name(&op, None, &ConfigOrFn::from(json!({}))).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::MissingName {
                node: "return_n".to_string()
            }
        );
    }

    #[test]
    fn test_inherit_falls_back_to_inner_name() {
        let executor = ExecutorDefinition::new("multiprocess");
        assert_eq!(
            configured_name(&executor, None, &named_fn()).unwrap(),
            Some("multiprocess".to_string())
        );
    }

    #[test]
    fn test_nameless_rejects_name() {
        let resource = ResourceDefinition::new();
        assert_eq!(configured_name(&resource, None, &named_fn()).unwrap(), None);
        let err = configured_name(&resource, Some("s3"), &named_fn()).unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::NameNotSupported {
                kind: DefinitionKind::Resource,
                ..
            }
        ));
    }
}
