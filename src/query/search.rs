//! Name search with birth and death year constraints

use super::types::PersonSummary;
use crate::classify::normalize_text;
use crate::graph::Individual;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Oldest first; undated individuals lead
    #[default]
    BirthAscending,
    BirthDescending,
    Name,
}

/// Query for finding individuals by name
#[derive(Debug, Clone, Default)]
pub struct PersonSearch {
    /// Name or name fragment (case-insensitive)
    pub name: String,
    /// Require the whole name to match instead of a fragment
    pub exact: bool,
    pub min_birth: Option<i32>,
    pub max_birth: Option<i32>,
    pub min_death: Option<i32>,
    pub max_death: Option<i32>,
    pub order: SortOrder,
    /// Maximum number of results
    pub limit: Option<usize>,
}

impl PersonSearch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Match the whole name rather than a fragment
    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    pub fn born_between(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_birth = min;
        self.max_birth = max;
        self
    }

    pub fn died_between(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_death = min;
        self.max_death = max;
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run the search over `people`
    pub fn execute<'a>(&self, people: impl IntoIterator<Item = &'a Individual>) -> Vec<PersonSummary> {
        let needle = normalize_text(&self.name);

        let mut results: Vec<PersonSummary> = people
            .into_iter()
            .filter(|individual| self.name_matches(&needle, individual))
            .map(PersonSummary::from)
            .filter(|summary| {
                within(summary.birth_year, self.min_birth, self.max_birth)
                    && within(summary.death_year, self.min_death, self.max_death)
            })
            .collect();

        match self.order {
            SortOrder::BirthAscending => {
                results.sort_by(|a, b| a.birth_year.cmp(&b.birth_year).then_with(|| a.name.cmp(&b.name)))
            }
            SortOrder::BirthDescending => results.sort_by(|a, b| {
                Reverse(a.birth_year)
                    .cmp(&Reverse(b.birth_year))
                    .then_with(|| a.name.cmp(&b.name))
            }),
            SortOrder::Name => results.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))),
        }

        if let Some(limit) = self.limit {
            results.truncate(limit);
        }
        results
    }

    fn name_matches(&self, needle: &str, individual: &Individual) -> bool {
        let Some(name) = individual.name.as_deref() else {
            return false;
        };
        let name = normalize_text(name);
        if self.exact {
            name == needle
        } else {
            name.contains(needle)
        }
    }
}

/// Undated individuals fail any constraint that is set
fn within(year: Option<i32>, min: Option<i32>, max: Option<i32>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    match year {
        Some(year) => min.map_or(true, |min| year >= min) && max.map_or(true, |max| year <= max),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Field;

    fn people() -> Vec<Individual> {
        vec![
            Individual::new("@I1@")
                .with_name("Thomas Moss")
                .with_field(Field::new("BIRT").with_year(1851))
                .with_field(Field::new("DEAT").with_year(1920)),
            Individual::new("@I2@")
                .with_name("John Moss")
                .with_field(Field::new("BIRT").with_year(1822)),
            Individual::new("@I3@").with_name("Mary Mossop"),
            Individual::new("@I4@").with_name("Ann Platt"),
            Individual::new("@I5@"),
        ]
    }

    fn names(results: &[PersonSummary]) -> Vec<&str> {
        results.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_fragment_match_sorted_by_birth() {
        let people = people();
        let results = PersonSearch::new("MOSS").execute(&people);
        assert_eq!(names(&results), vec!["Mary Mossop", "John Moss", "Thomas Moss"]);
    }

    #[test]
    fn test_exact_match() {
        let people = people();
        let results = PersonSearch::new("  john   moss").exact().execute(&people);
        assert_eq!(names(&results), vec!["John Moss"]);
    }

    #[test]
    fn test_birth_constraint_drops_undated() {
        let people = people();
        let results = PersonSearch::new("moss")
            .born_between(Some(1800), Some(1830))
            .execute(&people);
        assert_eq!(names(&results), vec!["John Moss"]);
    }

    #[test]
    fn test_death_constraint() {
        let people = people();
        let results = PersonSearch::new("moss")
            .died_between(None, Some(1950))
            .execute(&people);
        assert_eq!(names(&results), vec!["Thomas Moss"]);
    }

    #[test]
    fn test_descending_and_limit() {
        let people = people();
        let results = PersonSearch::new("moss")
            .order(SortOrder::BirthDescending)
            .limit(2)
            .execute(&people);
        assert_eq!(names(&results), vec!["Thomas Moss", "John Moss"]);
    }

    #[test]
    fn test_unnamed_never_match() {
        let people = people();
        assert_eq!(PersonSearch::new("").execute(&people).len(), 4);
    }
}
