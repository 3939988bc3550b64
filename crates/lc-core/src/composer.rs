//! The config composer: resolves a configured definition layer by layer.
//!
//! Resolution of a definition `E` with config `C` (already validated by the
//! caller against `E`'s own schema):
//!
//! 1. Base definition: `C` is the result.
//! 2. Otherwise run `E`'s mapping on `C["config"]` inside the user-code
//!    boundary. A failure is a [`ConfigMappingFunctionError`] naming `E`.
//! 3. Validate `{"config": draft}` against the wrapped definition's schema.
//! 4. Rejected: return the errors. Nothing further down runs.
//! 5. Accepted: resolve the wrapped definition with the validated draft.
//!
//! The outer layer is never re-validated here; that is the caller's job.

use lc_common::value::{config_entry, config_envelope};
use lc_common::{
    user_code_error_boundary, ConfigMappingFunctionError, ConfigPath, ConfigValue, ErrorReason,
    UserCodeError, ValidationError, ValidationResult,
};
use lc_schema::{ConfigSchema, SchemaValidator, StructuralValidator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::configurable::Configurable;
use crate::trace::{fingerprint, LayerOutcome, LayerRecord, ResolutionTrace, TracedResolution};

/// Tunables for the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerOptions {
    /// Deepest wrap chain that will be resolved. `None` resolves chains of
    /// any depth.
    pub max_depth: Option<usize>,
    /// Record draft fingerprints in traces.
    pub fingerprint_drafts: bool,
}

impl Default for ComposerOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            fingerprint_drafts: true,
        }
    }
}

/// Resolves configured definitions against a schema validator.
#[derive(Clone)]
pub struct Composer {
    validator: Arc<dyn SchemaValidator>,
    options: ComposerOptions,
}

impl Composer {
    pub fn new(validator: Arc<dyn SchemaValidator>) -> Self {
        Self {
            validator,
            options: ComposerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ComposerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ComposerOptions {
        &self.options
    }

    pub fn validator(&self) -> &dyn SchemaValidator {
        self.validator.as_ref()
    }

    /// Resolve `config` through every configured layer of `entity`.
    ///
    /// On success the value is the config envelope (`{"config": ...}`) for
    /// the innermost base definition.
    pub fn resolve(
        &self,
        entity: &dyn Configurable,
        config: ConfigValue,
    ) -> Result<ValidationResult, ConfigMappingFunctionError> {
        self.resolve_layer(entity, config, 0, None)
    }

    /// Like [`Composer::resolve`], also recording a [`ResolutionTrace`].
    pub fn resolve_traced(
        &self,
        entity: &dyn Configurable,
        config: ConfigValue,
    ) -> Result<TracedResolution, ConfigMappingFunctionError> {
        let mut trace = ResolutionTrace::new();
        let result = self.resolve_layer(entity, config, 0, Some(&mut trace))?;
        if self.options.fingerprint_drafts {
            trace.resolved_fingerprint = result.value().map(fingerprint);
        }
        Ok(TracedResolution { result, trace })
    }

    /// Validate `config` against `entity`'s own schema, then resolve it.
    ///
    /// For callers that hold raw, unvalidated config for the outermost layer.
    pub fn validate_and_resolve(
        &self,
        entity: &dyn Configurable,
        config: &ConfigValue,
    ) -> Result<ValidationResult, ConfigMappingFunctionError> {
        let schema = ConfigSchema::config_envelope(entity.config_schema());
        self.validator
            .validate(&schema, config)
            .and_then(|validated| self.resolve(entity, validated))
    }

    fn resolve_layer(
        &self,
        entity: &dyn Configurable,
        config: ConfigValue,
        depth: usize,
        mut trace: Option<&mut ResolutionTrace>,
    ) -> Result<ValidationResult, ConfigMappingFunctionError> {
        let Some(layer) = entity.configured_layer() else {
            if let Some(trace) = trace.as_deref_mut() {
                trace.push(self.record(entity, depth, LayerOutcome::Base, None));
            }
            return Ok(ValidationResult::success(config));
        };

        if let Some(max_depth) = self.options.max_depth.filter(|max| depth >= *max) {
            warn!(
                entity = entity.name().unwrap_or("<unnamed>"),
                max_depth,
                "configured chain too deep"
            );
            if let Some(trace) = trace.as_deref_mut() {
                trace.push(self.record(entity, depth, LayerOutcome::DepthExceeded, None));
            }
            return Ok(ValidationResult::failure(vec![ValidationError::new(
                ErrorReason::RecursionLimit,
                ConfigPath::root(),
                format!("configured chain exceeds the maximum depth of {max_depth}"),
            )]));
        }

        let inner = layer.inner.as_ref();
        let draft = user_code_error_boundary::<_, UserCodeError, _, _>(
            || mapping_error_message(entity),
            || layer.mapping.apply(&config_entry(&config)),
        )
        .map_err(|err| {
            ConfigMappingFunctionError::from_user_code(
                entity.kind(),
                entity.name().map(str::to_string),
                inner.name().map(str::to_string),
                depth,
                err,
            )
        })?;

        let inner_schema = ConfigSchema::config_envelope(inner.config_schema());
        match self.validator.validate(&inner_schema, &config_envelope(draft)) {
            ValidationResult::Failure(errors) => {
                warn!(
                    entity = entity.name().unwrap_or("<unnamed>"),
                    kind = %entity.kind(),
                    depth,
                    errors = errors.len(),
                    "config mapping output rejected by inner schema"
                );
                if let Some(trace) = trace.as_deref_mut() {
                    let outcome = LayerOutcome::Rejected {
                        error_count: errors.len(),
                    };
                    trace.push(self.record(entity, depth, outcome, None));
                }
                Ok(ValidationResult::failure(errors))
            }
            ValidationResult::Success(validated) => {
                debug!(
                    entity = entity.name().unwrap_or("<unnamed>"),
                    kind = %entity.kind(),
                    depth,
                    "config mapping applied"
                );
                if let Some(trace) = trace.as_deref_mut() {
                    let draft_fingerprint =
                        self.options.fingerprint_drafts.then(|| fingerprint(&validated));
                    trace.push(self.record(entity, depth, LayerOutcome::Mapped, draft_fingerprint));
                }
                self.resolve_layer(inner, validated, depth + 1, trace)
            }
        }
    }

    fn record(
        &self,
        entity: &dyn Configurable,
        depth: usize,
        outcome: LayerOutcome,
        draft_fingerprint: Option<String>,
    ) -> LayerRecord {
        LayerRecord {
            depth,
            kind: entity.kind(),
            name: entity.name().map(str::to_string),
            inner_name: entity
                .configured_layer()
                .and_then(|layer| layer.inner.name().map(str::to_string)),
            outcome,
            draft_fingerprint,
        }
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(Arc::new(StructuralValidator))
    }
}

impl fmt::Debug for Composer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn mapping_error_message(entity: &dyn Configurable) -> String {
    format!(
        "The config mapping function on a `configured` {} has thrown an unexpected error during its execution.",
        entity.kind()
    )
}

/// Resolve with the default composer and [`StructuralValidator`].
pub fn resolve(
    entity: &dyn Configurable,
    config: ConfigValue,
) -> Result<ValidationResult, ConfigMappingFunctionError> {
    Composer::default().resolve(entity, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configurable::{ConfigMappingFn, ConfigurableExt, ConfigureOptions};
    use crate::definitions::ResourceDefinition;
    use lc_schema::{ConfigType, Field};
    use serde_json::json;

    fn bucket_resource() -> ResourceDefinition {
        ResourceDefinition::new()
            .with_config_schema(ConfigSchema::shape([("bucket", Field::new(ConfigType::String))]))
    }

    #[test]
    fn test_base_is_identity() {
        let config = json!({"config": {"bucket": "prod"}});
        let result = resolve(&bucket_resource(), config.clone()).unwrap();
        assert_eq!(result, ValidationResult::success(config));
    }

    #[test]
    fn test_base_identity_does_not_validate() {
        let config = json!({"config": {"not": "checked"}});
        let result = resolve(&bucket_resource(), config.clone()).unwrap();
        assert_eq!(result.value(), Some(&config));
    }

    #[test]
    fn test_static_config_resolves() {
        let dev = bucket_resource()
            .configured(json!({"bucket": "dev"}), None, ConfigureOptions::default())
            .unwrap();
        let result = resolve(&dev, json!({})).unwrap();
        assert_eq!(result.value(), Some(&json!({"config": {"bucket": "dev"}})));
    }

    #[test]
    fn test_depth_limit() {
        let mut resource = bucket_resource()
            .configured(json!({"bucket": "dev"}), None, ConfigureOptions::default())
            .unwrap();
        for _ in 0..3 {
            resource = resource
                .configured(
                    ConfigMappingFn::new(|_: &ConfigValue| Ok(json!({}))),
                    None,
                    ConfigureOptions::default(),
                )
                .unwrap();
        }
        let composer = Composer::default().with_options(ComposerOptions {
            max_depth: Some(2),
            ..ComposerOptions::default()
        });
        let result = composer.resolve(&resource, json!({})).unwrap();
        assert_eq!(result.errors()[0].reason, ErrorReason::RecursionLimit);

        let generous = Composer::default();
        assert!(generous.resolve(&resource, json!({})).unwrap().is_success());
    }

    #[test]
    fn test_validate_and_resolve_checks_outer_layer() {
        let prefixed = bucket_resource()
            .configured(
                ConfigMappingFn::new(|cfg: &ConfigValue| {
                    Ok(json!({"bucket": format!("{}-dev", cfg["prefix"].as_str().unwrap_or_default())}))
                }),
                Some(ConfigSchema::shape([("prefix", Field::new(ConfigType::String))])),
                ConfigureOptions::default(),
            )
            .unwrap();
        let composer = Composer::default();

        let bad = composer
            .validate_and_resolve(&prefixed, &json!({"config": {"prefix": 1}}))
            .unwrap();
        assert_eq!(bad.errors()[0].path.to_string(), "root:config:prefix");

        let good = composer
            .validate_and_resolve(&prefixed, &json!({"config": {"prefix": "acme"}}))
            .unwrap();
        assert_eq!(good.value(), Some(&json!({"config": {"bucket": "acme-dev"}})));
    }

    #[test]
    fn test_composer_options_deserialize_with_defaults() {
        let options: ComposerOptions = serde_json::from_str(r#"{"max_depth": 8}"#).unwrap();
        assert_eq!(options.max_depth, Some(8));
        assert!(options.fingerprint_drafts);
        assert_eq!(ComposerOptions::default().max_depth, None);
    }

    #[test]
    fn test_default_composer_has_no_depth_limit() {
        let mut resource = bucket_resource()
            .configured(json!({"bucket": "dev"}), None, ConfigureOptions::default())
            .unwrap();
        for _ in 0..100 {
            resource = resource
                .configured(
                    ConfigMappingFn::new(|_: &ConfigValue| Ok(json!({}))),
                    None,
                    ConfigureOptions::default(),
                )
                .unwrap();
        }
        let result = Composer::default().resolve(&resource, json!({})).unwrap();
        assert_eq!(result.value(), Some(&json!({"config": {"bucket": "dev"}})));
    }
}
