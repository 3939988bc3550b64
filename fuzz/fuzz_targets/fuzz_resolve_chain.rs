//! Fuzz target for layered resolution.
//!
//! Builds a chain of configured resources whose mappings pick entries out of
//! an arbitrary JSON input, then resolves it. Resolution must return a
//! result or a mapping error, never panic, and run each mapping at most once.

#![no_main]

use arbitrary::Arbitrary;
use lc_common::ConfigValue;
use lc_core::{
    Composer, ComposerOptions, ConfigMappingFn, ConfigurableExt, ConfigureOptions,
    ResourceDefinition,
};
use lc_schema::{ConfigSchema, ConfigType, Field};
use libfuzzer_sys::fuzz_target;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Arbitrary, Debug)]
struct Input {
    config: String,
    keys: Vec<String>,
    max_depth: Option<u8>,
}

fuzz_target!(|input: Input| {
    let Ok(config) = serde_json::from_str::<ConfigValue>(&input.config) else {
        return;
    };

    let schema = ConfigSchema::shape([("value", Field::new(ConfigType::Any))]);
    let calls = Arc::new(AtomicUsize::new(0));
    let mut resource = ResourceDefinition::new().with_config_schema(schema.clone());
    for key in input.keys.iter().take(16) {
        let key = key.clone();
        let counter = Arc::clone(&calls);
        let Ok(next) = resource.configured(
            ConfigMappingFn::new(move |cfg: &ConfigValue| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(serde_json::json!({"value": cfg.get(&key).cloned().unwrap_or_default()}))
            }),
            Some(schema.clone()),
            ConfigureOptions::default(),
        ) else {
            return;
        };
        resource = next;
    }

    let composer = Composer::default().with_options(ComposerOptions {
        max_depth: input.max_depth.map(usize::from),
        ..ComposerOptions::default()
    });
    let _ = composer.resolve(&resource, serde_json::json!({"config": config}));
    assert!(calls.load(Ordering::SeqCst) <= input.keys.len().min(16));
});
