//! Fuzz target for config schema parsing and structural validation.
//!
//! Schemas may be declared in JSON, so parsing, checking, and validating
//! against them must never panic on arbitrary input.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lc_schema::{process_config, ConfigSchema};

#[derive(Arbitrary, Debug)]
struct Input {
    schema: String,
    config: String,
}

fuzz_target!(|input: Input| {
    let Ok(schema) = ConfigSchema::from_json(&input.schema) else {
        return;
    };
    let well_formed = schema.check().is_ok();
    let Ok(config) = serde_json::from_str(&input.config) else {
        return;
    };
    let first = process_config(&schema, &config);
    // Against a well-formed schema, processing a processed value changes
    // nothing.
    if let (true, Some(processed)) = (well_formed, first.value()) {
        let second = process_config(&schema, processed);
        assert_eq!(second.value(), Some(processed));
    }
});
