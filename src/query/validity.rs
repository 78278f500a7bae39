//! Data-quality checks

use super::types::PersonSummary;
use crate::graph::date::{parse_date, years_between};
use crate::graph::{GenealogyGraph, Individual};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An individual recorded as dying before being born
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeAnomaly {
    pub person: PersonSummary,
    pub born: NaiveDate,
    pub died: NaiveDate,
    /// Whole years from birth to death; never positive
    pub age: i32,
}

fn first_date(individual: &Individual, tags: &[&str]) -> Option<NaiveDate> {
    tags.iter()
        .find_map(|tag| individual.event_date(tag).and_then(parse_date))
}

/// Individuals whose death date precedes their birth date
pub fn negative_ages<'a>(people: impl IntoIterator<Item = &'a Individual>) -> Vec<AgeAnomaly> {
    people
        .into_iter()
        .filter_map(|individual| {
            let born = first_date(individual, &["BIRT", "BAPM", "CHR"])?;
            let died = first_date(individual, &["DEAT", "BURI"])?;
            (died < born).then(|| AgeAnomaly {
                person: PersonSummary::from(individual),
                born,
                died,
                age: years_between(born, died),
            })
        })
        .collect()
}

/// Individuals with no family link in either direction
pub fn orphans(graph: &GenealogyGraph) -> Vec<PersonSummary> {
    graph
        .individuals()
        .filter(|individual| !graph.has_family(&individual.id))
        .map(PersonSummary::from)
        .collect()
}
