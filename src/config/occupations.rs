//! Occupation groups and combinable patterns

use super::store::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The occupation configuration document
///
/// ```json
/// {
///   "occupation_groups": { "Blacksmith": ["blacksmith", "smith"] },
///   "occupation_patterns": { "apprentice": "apprentice" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupationTable {
    /// Canonical group name → aliases (matched case-insensitively)
    #[serde(default)]
    pub occupation_groups: BTreeMap<String, Vec<String>>,
    /// Pattern name → pattern text, layered on top of a group match
    #[serde(default)]
    pub occupation_patterns: BTreeMap<String, String>,
}

impl OccupationTable {
    pub fn is_empty(&self) -> bool {
        self.occupation_groups.is_empty()
    }

    /// Aliases claimed by more than one group.
    ///
    /// Classification stays deterministic (group name breaks the tie) but the
    /// config author almost certainly meant one of them.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut owners: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (group, aliases) in &self.occupation_groups {
            for alias in aliases {
                let key = alias.trim().to_lowercase();
                if key.is_empty() {
                    continue;
                }
                let groups = owners.entry(key).or_default();
                if !groups.contains(group) {
                    groups.push(group.clone());
                }
            }
        }

        owners
            .into_iter()
            .filter(|(_, groups)| groups.len() > 1)
            .map(|(alias, groups)| ConfigError::DuplicateAlias { alias, groups })
            .collect()
    }
}
