//! Query types and result structures

use crate::graph::{Individual, IndividualId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive birth-year bounds; either side optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
    /// Drop members whose year cannot be resolved
    #[serde(default)]
    pub exclude_undated: bool,
}

impl YearRange {
    /// No bounds; keeps everyone
    pub fn any() -> Self {
        Self::default()
    }

    pub fn between(min: Option<i32>, max: Option<i32>) -> Self {
        Self {
            min,
            max,
            exclude_undated: false,
        }
    }

    pub fn exclude_undated(mut self) -> Self {
        self.exclude_undated = true;
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none() && !self.exclude_undated
    }

    pub fn contains(&self, year: Option<i32>) -> bool {
        match year {
            Some(year) => {
                self.min.map_or(true, |min| year >= min) && self.max.map_or(true, |max| year <= max)
            }
            None => !self.exclude_undated,
        }
    }
}

/// A parent link that pointed back into the individual's own descent path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    /// Individual whose parent link closed the loop
    pub descendant: IndividualId,
    /// Already-visited individual the link pointed to
    pub ancestor: IndividualId,
}

/// Result of an ancestor walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorSet {
    pub root: IndividualId,
    /// Generation 0 is the root, 1 its parents, and so on
    pub generations: Vec<Vec<IndividualId>>,
    /// Siblings, spouses and children of ancestors, when requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<IndividualId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cycles: Vec<Cycle>,
    /// Walked through but dropped by the year filter
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<IndividualId>,
}

impl AncestorSet {
    pub fn new(root: IndividualId) -> Self {
        Self {
            generations: vec![vec![root.clone()]],
            root,
            relations: Vec::new(),
            cycles: Vec::new(),
            excluded: Vec::new(),
        }
    }

    /// Every member: generations in order, then relations
    pub fn members(&self) -> impl Iterator<Item = &IndividualId> {
        self.generations.iter().flatten().chain(self.relations.iter())
    }

    pub fn ids(&self) -> BTreeSet<IndividualId> {
        self.members().cloned().collect()
    }

    pub fn contains(&self, id: &IndividualId) -> bool {
        self.members().any(|member| member == id)
    }

    pub fn len(&self) -> usize {
        self.generations.iter().map(Vec::len).sum::<usize>() + self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn generation_of(&self, id: &IndividualId) -> Option<usize> {
        self.generations
            .iter()
            .position(|generation| generation.contains(id))
    }
}

/// Compact view of an individual for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: IndividualId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_year: Option<i32>,
}

impl From<&Individual> for PersonSummary {
    fn from(individual: &Individual) -> Self {
        Self {
            id: individual.id.clone(),
            name: individual.display_name().to_string(),
            birth_year: individual.birth_year(),
            death_year: individual.death_year(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_bounds() {
        let range = YearRange::between(Some(1800), Some(1850));
        assert!(range.contains(Some(1800)));
        assert!(range.contains(Some(1850)));
        assert!(!range.contains(Some(1851)));
        assert!(range.contains(None));
        assert!(!range.exclude_undated().contains(None));
        assert!(YearRange::between(None, Some(1700)).contains(Some(1650)));
    }

    #[test]
    fn test_unbounded() {
        assert!(YearRange::any().is_unbounded());
        assert!(!YearRange::any().exclude_undated().is_unbounded());
    }

    #[test]
    fn test_ancestor_set_membership() {
        let mut set = AncestorSet::new(IndividualId::from("@I1@"));
        set.generations.push(vec!["@I2@".into(), "@I3@".into()]);
        set.relations.push("@I9@".into());

        assert_eq!(set.len(), 4);
        assert!(set.contains(&"@I9@".into()));
        assert_eq!(set.generation_of(&"@I3@".into()), Some(1));
        assert_eq!(set.generation_of(&"@I9@".into()), None);
    }
}
