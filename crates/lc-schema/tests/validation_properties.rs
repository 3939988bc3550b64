//! Property-based tests for the structural validator.
//!
//! Uses proptest to check that error reporting is complete and ordered.

use lc_common::ErrorReason;
use lc_schema::{process_config, ConfigSchema, ConfigType, Field};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn field_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,8}", 1..8)
        .prop_map(|names| names.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every missing required field is reported, in declaration order.
    #[test]
    fn missing_fields_reported_in_declaration_order(names in field_names()) {
        let schema = ConfigSchema::shape(
            names.iter().map(|n| (n.clone(), Field::new(ConfigType::Int))),
        );
        let result = process_config(&schema, &json!({}));
        let reported: Vec<String> = result
            .errors()
            .iter()
            .map(|e| {
                prop_assert_eq!(e.reason, ErrorReason::MissingRequiredField);
                Ok(e.message.split('"').nth(1).unwrap_or_default().to_string())
            })
            .collect::<Result<_, TestCaseError>>()?;
        prop_assert_eq!(reported, names);
    }

    /// A value built to match the schema always validates, and processing
    /// it is idempotent.
    #[test]
    fn matching_value_validates_idempotently(names in field_names(), seed in any::<i64>()) {
        let schema = ConfigSchema::shape(
            names.iter().map(|n| (n.clone(), Field::new(ConfigType::Int))),
        );
        let mut entries = Map::new();
        for (i, name) in names.iter().enumerate() {
            entries.insert(name.clone(), json!(seed.wrapping_add(i as i64)));
        }
        let value = Value::Object(entries);
        let first = process_config(&schema, &value);
        prop_assert!(first.is_success());
        let processed = first.value().cloned().unwrap_or_default();
        prop_assert_eq!(&processed, &value);
        let second = process_config(&schema, &processed);
        prop_assert_eq!(second.value(), Some(&processed));
    }

    /// Undeclared keys are each reported once, in sorted order.
    #[test]
    fn undeclared_keys_reported_sorted(extra in prop::collection::btree_set("[A-Z]{1,6}", 1..6)) {
        let schema = ConfigSchema::empty();
        let mut entries = Map::new();
        for key in &extra {
            entries.insert(key.clone(), json!(1));
        }
        let result = process_config(&schema, &Value::Object(entries));
        prop_assert_eq!(result.errors().len(), extra.len());
        for (err, key) in result.errors().iter().zip(extra.iter()) {
            prop_assert_eq!(err.reason, ErrorReason::FieldNotDefined);
            let quoted = format!("\"{}\"", key);
            prop_assert!(err.message.contains(&quoted));
        }
    }
}
