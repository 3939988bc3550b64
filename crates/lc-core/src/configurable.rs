//! The configurable capability and the `configured` wrapping operation.
//!
//! Any definition implementing [`Configurable`] can be wrapped by a config
//! mapping: the wrapper declares its own schema, and at resolution time maps
//! its validated config into config for the definition it wraps. Wrapping
//! never mutates the original; it allocates a new definition of the same
//! kind whose [`ConfiguredLayer`] owns the original.

use lc_common::{BoxError, ConfigValue, DefinitionError, DefinitionKind};
use lc_schema::ConfigSchema;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::naming::{configured_name, NamingPolicy};

type MappingFn = dyn Fn(&ConfigValue) -> Result<ConfigValue, BoxError> + Send + Sync;

/// A user-supplied config mapping function.
///
/// Its optional identifier stands in for a function name when naming the
/// configured definition.
#[derive(Clone)]
pub struct ConfigMappingFn {
    name: Option<String>,
    f: Arc<MappingFn>,
}

impl ConfigMappingFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ConfigValue) -> Result<ConfigValue, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: None,
            f: Arc::new(f),
        }
    }

    pub fn named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ConfigValue) -> Result<ConfigValue, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn call(&self, config: &ConfigValue) -> Result<ConfigValue, BoxError> {
        (self.f)(config)
    }
}

impl fmt::Debug for ConfigMappingFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigMappingFn")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Config supplied to `configured`: a mapping function or a static value.
#[derive(Debug, Clone)]
pub enum ConfigOrFn {
    Mapping(ConfigMappingFn),
    /// Constant config; the wrapper's input is ignored.
    Static(ConfigValue),
}

impl ConfigOrFn {
    pub fn is_callable(&self) -> bool {
        matches!(self, ConfigOrFn::Mapping(_))
    }

    /// Identifier of the mapping function, if it has one.
    pub fn fn_name(&self) -> Option<&str> {
        match self {
            ConfigOrFn::Mapping(f) => f.name(),
            ConfigOrFn::Static(_) => None,
        }
    }

    /// Produce a draft config for the wrapped definition.
    pub fn apply(&self, config: &ConfigValue) -> Result<ConfigValue, BoxError> {
        match self {
            ConfigOrFn::Mapping(f) => f.call(config),
            ConfigOrFn::Static(value) => Ok(value.clone()),
        }
    }
}

impl From<ConfigMappingFn> for ConfigOrFn {
    fn from(f: ConfigMappingFn) -> Self {
        ConfigOrFn::Mapping(f)
    }
}

impl From<ConfigValue> for ConfigOrFn {
    fn from(value: ConfigValue) -> Self {
        ConfigOrFn::Static(value)
    }
}

/// The mapping layered in front of a wrapped definition.
#[derive(Debug, Clone)]
pub struct ConfiguredLayer {
    pub mapping: ConfigOrFn,
    /// The definition this layer feeds, which may itself be configured.
    pub inner: Arc<dyn Configurable>,
}

/// Everything a definition kind needs to build its configured copy.
#[derive(Debug, Clone)]
pub struct ConfiguredCopy {
    pub name: Option<String>,
    pub description: Option<String>,
    pub config_schema: Option<ConfigSchema>,
    pub layer: ConfiguredLayer,
}

/// Optional naming for `configured`.
#[derive(Debug, Clone, Default)]
pub struct ConfigureOptions {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ConfigureOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A definition with a config schema that can be wrapped by config mappings.
pub trait Configurable: fmt::Debug + Send + Sync {
    fn kind(&self) -> DefinitionKind;

    fn name(&self) -> Option<&str>;

    fn description(&self) -> Option<&str>;

    /// Schema of the config this definition accepts from outside.
    fn config_schema(&self) -> Option<&ConfigSchema>;

    /// The mapping layered in front of the wrapped definition; `None` for a
    /// base definition.
    fn configured_layer(&self) -> Option<&ConfiguredLayer>;

    fn naming_policy(&self) -> NamingPolicy;

    fn is_preconfigured(&self) -> bool {
        self.configured_layer().is_some()
    }

    /// Build a definition of the same kind carrying `copy`.
    fn copy_for_configured(&self, copy: ConfiguredCopy) -> Self
    where
        Self: Sized;
}

/// Provides `configured` on every cloneable [`Configurable`].
pub trait ConfigurableExt: Configurable + Clone + Sized + 'static {
    /// Wrap this definition in a new one of the same kind that supplies its
    /// config.
    ///
    /// A static config may not come with a schema. `config_schema` is the
    /// schema of the *new* definition's config, the input of the mapping.
    fn configured(
        &self,
        config_or_fn: impl Into<ConfigOrFn>,
        config_schema: Option<ConfigSchema>,
        options: ConfigureOptions,
    ) -> Result<Self, DefinitionError> {
        let mapping = config_or_fn.into();
        if !mapping.is_callable() && config_schema.is_some() {
            return Err(DefinitionError::StaticConfigWithSchema);
        }
        if let Some(schema) = &config_schema {
            schema.check()?;
        }

        let name = configured_name(self, options.name.as_deref(), &mapping)?;
        let description = options
            .description
            .or_else(|| self.description().map(str::to_string));

        debug!(
            kind = %self.kind(),
            inner = self.name().unwrap_or("<unnamed>"),
            name = name.as_deref().unwrap_or("<unnamed>"),
            callable = mapping.is_callable(),
            "configuring definition"
        );

        let layer = ConfiguredLayer {
            mapping,
            inner: Arc::new(self.clone()),
        };
        Ok(self.copy_for_configured(ConfiguredCopy {
            name,
            description,
            config_schema,
            layer,
        }))
    }

    /// Number of configured layers above the base definition.
    fn configured_depth(&self) -> usize {
        let mut depth = 0;
        let mut layer = self.configured_layer();
        while let Some(current) = layer {
            depth += 1;
            layer = current.inner.configured_layer();
        }
        depth
    }
}

impl<T: Configurable + Clone + 'static> ConfigurableExt for T {}
