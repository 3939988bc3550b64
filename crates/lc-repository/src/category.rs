//! Repository definition categories.

use lc_common::DefinitionKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Keys accepted in a category map source. `pipelines` is an alias of
/// `jobs`.
pub const VALID_CATEGORY_KEYS: &[&str] =
    &["jobs", "partition_sets", "pipelines", "schedules", "sensors"];

/// The groups a repository indexes its definitions under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionCategory {
    Jobs,
    PartitionSets,
    Schedules,
    Sensors,
}

impl DefinitionCategory {
    pub const ALL: [DefinitionCategory; 4] = [
        DefinitionCategory::Jobs,
        DefinitionCategory::PartitionSets,
        DefinitionCategory::Schedules,
        DefinitionCategory::Sensors,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionCategory::Jobs => "jobs",
            DefinitionCategory::PartitionSets => "partition_sets",
            DefinitionCategory::Schedules => "schedules",
            DefinitionCategory::Sensors => "sensors",
        }
    }

    /// The category a definition of `kind` is indexed under, if any.
    ///
    /// Graphs index as jobs.
    pub fn for_kind(kind: DefinitionKind) -> Option<Self> {
        match kind {
            DefinitionKind::Job | DefinitionKind::Graph => Some(DefinitionCategory::Jobs),
            DefinitionKind::PartitionSet => Some(DefinitionCategory::PartitionSets),
            DefinitionKind::Schedule => Some(DefinitionCategory::Schedules),
            DefinitionKind::Sensor => Some(DefinitionCategory::Sensors),
            _ => None,
        }
    }
}

impl fmt::Display for DefinitionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefinitionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jobs" | "pipelines" => Ok(DefinitionCategory::Jobs),
            "partition_sets" => Ok(DefinitionCategory::PartitionSets),
            "schedules" => Ok(DefinitionCategory::Schedules),
            "sensors" => Ok(DefinitionCategory::Sensors),
            other => Err(format!("unknown definition category '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys_parse() {
        for key in VALID_CATEGORY_KEYS {
            assert!(key.parse::<DefinitionCategory>().is_ok(), "{key}");
        }
        assert_eq!(
            "pipelines".parse::<DefinitionCategory>(),
            Ok(DefinitionCategory::Jobs)
        );
        assert!("solids".parse::<DefinitionCategory>().is_err());
    }

    #[test]
    fn test_round_trip_display() {
        for category in DefinitionCategory::ALL {
            assert_eq!(category.to_string().parse::<DefinitionCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            DefinitionCategory::for_kind(DefinitionKind::Graph),
            Some(DefinitionCategory::Jobs)
        );
        assert_eq!(DefinitionCategory::for_kind(DefinitionKind::Op), None);
        assert_eq!(DefinitionCategory::for_kind(DefinitionKind::Resource), None);
    }
}
