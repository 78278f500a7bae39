//! Occupation classification by alias containment

use super::normalize::normalize_text;
use crate::config::OccupationTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical occupation group, or the original text when nothing matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OccupationClass {
    Group {
        name: String,
        /// Names of every pattern found in the text, sorted
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        patterns: Vec<String>,
        /// The alias that selected the group
        alias: String,
    },
    Unclassified { original: String },
}

impl OccupationClass {
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::Group { name, .. } => Some(name),
            Self::Unclassified { .. } => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, Self::Group { .. })
    }

    /// `"Blacksmith (apprentice)"`; patterns compose with, never replace, the group
    pub fn display_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OccupationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group { name, patterns, .. } if patterns.is_empty() => write!(f, "{}", name),
            Self::Group { name, patterns, .. } => write!(f, "{} ({})", name, patterns.join(", ")),
            Self::Unclassified { original } => write!(f, "{}", original),
        }
    }
}

/// Maps free-text job descriptions onto an [`OccupationTable`].
#[derive(Debug, Clone, Default)]
pub struct OccupationClassifier {
    /// (group, normalized alias)
    aliases: Vec<(String, String)>,
    /// (pattern name, normalized pattern), in name order
    patterns: Vec<(String, String)>,
}

impl OccupationClassifier {
    pub fn new(table: &OccupationTable) -> Self {
        let aliases = table
            .occupation_groups
            .iter()
            .flat_map(|(group, aliases)| {
                aliases
                    .iter()
                    .map(|alias| normalize_text(alias))
                    .filter(|alias| !alias.is_empty())
                    .map(move |alias| (group.clone(), alias))
            })
            .collect();
        let patterns = table
            .occupation_patterns
            .iter()
            .map(|(name, pattern)| (name.clone(), normalize_text(pattern)))
            .filter(|(_, pattern)| !pattern.is_empty())
            .collect();
        Self { aliases, patterns }
    }

    /// Classify raw occupation text.
    ///
    /// Any alias occurring as a substring matches. The longest alias wins,
    /// then the earliest occurrence, then the group name.
    pub fn classify(&self, raw: &str) -> OccupationClass {
        let text = normalize_text(raw);

        let best = self
            .aliases
            .iter()
            .filter_map(|(group, alias)| {
                text.find(alias.as_str())
                    .map(|position| (alias.chars().count(), position, group, alias))
            })
            .min_by(|a, b| {
                b.0.cmp(&a.0)
                    .then_with(|| a.1.cmp(&b.1))
                    .then_with(|| a.2.cmp(b.2))
            });

        let Some((_, _, group, alias)) = best else {
            tracing::debug!(raw, "unclassified occupation");
            return OccupationClass::Unclassified {
                original: raw.to_string(),
            };
        };

        let patterns = self
            .patterns
            .iter()
            .filter(|(_, pattern)| text.contains(pattern.as_str()))
            .map(|(name, _)| name.clone())
            .collect();

        OccupationClass::Group {
            name: group.clone(),
            patterns,
            alias: alias.clone(),
        }
    }
}
