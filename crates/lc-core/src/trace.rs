//! Resolution traces for auditing how a configured definition was resolved.
//!
//! A trace records every layer visited, root to leaf, with a SHA-256
//! fingerprint of the draft each layer handed down. Two resolutions with
//! equal fingerprints produced structurally equal configs.

use chrono::{DateTime, Utc};
use lc_common::{ConfigValue, DefinitionKind, ValidationResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// What happened at one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LayerOutcome {
    /// The mapping's draft validated against the inner schema.
    Mapped,
    /// The inner schema rejected the mapping's draft.
    Rejected { error_count: usize },
    /// The chain exceeded the composer's depth limit here.
    DepthExceeded,
    /// Innermost definition; its config is the resolved value.
    Base,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerRecord {
    pub depth: usize,
    pub kind: DefinitionKind,
    pub name: Option<String>,
    pub inner_name: Option<String>,
    #[serde(flatten)]
    pub outcome: LayerOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_fingerprint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionTrace {
    pub started_at: DateTime<Utc>,
    pub layers: Vec<LayerRecord>,
    #[serde(default)]
    pub resolved_fingerprint: Option<String>,
}

impl ResolutionTrace {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            layers: Vec::new(),
            resolved_fingerprint: None,
        }
    }

    pub fn push(&mut self, record: LayerRecord) {
        self.layers.push(record);
    }

    /// Number of mapping functions that ran.
    pub fn mappings_applied(&self) -> usize {
        self.layers
            .iter()
            .filter(|l| !matches!(l.outcome, LayerOutcome::Base | LayerOutcome::DepthExceeded))
            .count()
    }

    /// The layer whose schema rejected a draft, if any.
    pub fn rejected_layer(&self) -> Option<&LayerRecord> {
        self.layers
            .iter()
            .find(|l| matches!(l.outcome, LayerOutcome::Rejected { .. }))
    }
}

impl Default for ResolutionTrace {
    fn default() -> Self {
        Self::new()
    }
}

/// A resolution outcome plus the trace that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracedResolution {
    pub result: ValidationResult,
    pub trace: ResolutionTrace,
}

/// SHA-256 hex digest of the compact JSON form of `value`.
///
/// Object keys serialize sorted, so the digest is stable for structurally
/// equal values.
pub fn fingerprint(value: &ConfigValue) -> String {
    hex::encode(Sha256::digest(value.to_string().as_bytes()))
}
