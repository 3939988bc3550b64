//! Shared helpers for lc-core integration tests.

#![allow(dead_code)]

use lc_common::{ConfigValue, ValidationResult};
use lc_schema::{ConfigSchema, SchemaValidator, StructuralValidator};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness. Set `RUST_LOG=debug` to
/// see per-layer resolution events.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A validator that records every schema it is asked to check.
#[derive(Default)]
pub struct CountingValidator {
    seen: Mutex<Vec<ConfigSchema>>,
}

impl CountingValidator {
    pub fn seen(&self) -> Vec<ConfigSchema> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.seen().len()
    }
}

impl SchemaValidator for CountingValidator {
    fn validate(&self, schema: &ConfigSchema, config: &ConfigValue) -> ValidationResult {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(schema.clone());
        }
        StructuralValidator.validate(schema, config)
    }
}
