//! Configuration schemas and the structural validator.
//!
//! A [`ConfigSchema`] describes the configuration a definition accepts. The
//! [`SchemaValidator`] trait is the seam the composer validates through;
//! [`StructuralValidator`] is the bundled implementation. Validation also
//! *processes* the value: defaults of missing fields are filled in, so the
//! value carried by a successful [`lc_common::ValidationResult`] is the
//! resolved configuration.
//!
//! # Example
//!
//! ```
//! use lc_schema::{process_config, ConfigSchema, ConfigType, Field};
//! use serde_json::json;
//!
//! let schema = ConfigSchema::shape([
//!     ("bucket", Field::new(ConfigType::String)),
//!     ("retries", Field::new(ConfigType::Int).with_default(json!(3))),
//! ]);
//! let result = process_config(&schema, &json!({"bucket": "dev"}));
//! assert_eq!(result.value(), Some(&json!({"bucket": "dev", "retries": 3})));
//! ```

pub mod schema;
pub mod validate;

pub use schema::{ConfigSchema, ConfigType, Field, Shape, ShapeField};
pub use validate::{process_config, SchemaValidator, StructuralValidator};
