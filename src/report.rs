//! Folding classified values into per-lineage counts

use crate::classify::{OccupationClass, PlaceClass, PlaceClassification};
use crate::extract::ExtractedField;
use crate::query::PersonSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An extracted birthplace with its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedBirthplace {
    pub field: ExtractedField,
    pub classification: PlaceClassification,
}

/// An extracted occupation with its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedOccupation {
    pub field: ExtractedField,
    pub class: OccupationClass,
}

/// Count for a county, or for a direct nation place, at a nation's top level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceTally {
    pub total: usize,
    /// Stored directly under the nation rather than as a county
    pub direct: bool,
    /// County places (with locality when known) → count
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub places: BTreeMap<String, usize>,
    /// Matched the county but not a listed place
    #[serde(default, skip_serializing_if = "is_zero")]
    pub unlisted: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationTally {
    pub total: usize,
    /// Counties and direct places side by side
    pub entries: BTreeMap<String, PlaceTally>,
    /// Only the nation could be resolved
    #[serde(default, skip_serializing_if = "is_zero")]
    pub nation_only: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// A value accepted only after correction, kept for audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyMatch {
    pub person: PersonSummary,
    pub value: String,
    pub classified_as: String,
}

/// Someone whose records disagree on where they were born
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleBirthplaces {
    pub person: PersonSummary,
    /// `value (tag)` for each distinct place
    pub values: Vec<String>,
}

/// Birthplace counts for a set of individuals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthplaceReport {
    pub individuals: usize,
    pub nations: BTreeMap<String, NationTally>,
    /// Original text → count
    pub unclassified: BTreeMap<String, usize>,
    pub fuzzy: Vec<FuzzyMatch>,
    pub multiple: Vec<MultipleBirthplaces>,
    pub missing: Vec<PersonSummary>,
}

impl BirthplaceReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one individual's classified birthplaces.
    ///
    /// Each distinct place counts once per individual, however many records
    /// mention it.
    pub fn add_person(&mut self, person: PersonSummary, records: Vec<ClassifiedBirthplace>) {
        self.individuals += 1;
        if records.is_empty() {
            self.missing.push(person);
            return;
        }

        let mut distinct: Vec<&ClassifiedBirthplace> = Vec::new();
        for record in &records {
            let duplicate = distinct.iter().any(|seen| same_place(seen, record));
            if !duplicate {
                distinct.push(record);
            }
        }

        for record in &distinct {
            self.tally(&record.classification.class);
            if record.classification.fuzzy {
                self.fuzzy.push(FuzzyMatch {
                    person: person.clone(),
                    value: record.field.value.clone(),
                    classified_as: record.classification.class.to_string(),
                });
            }
        }

        if distinct.len() > 1 {
            self.multiple.push(MultipleBirthplaces {
                values: distinct
                    .iter()
                    .map(|r| format!("{} ({})", r.field.value, r.field.tag))
                    .collect(),
                person,
            });
        }
    }

    fn tally(&mut self, class: &PlaceClass) {
        match class {
            PlaceClass::DirectNationPlace { nation, place } => {
                let nation = self.nation(nation);
                let entry = nation.entries.entry(place.clone()).or_default();
                entry.direct = true;
                entry.total += 1;
            }
            PlaceClass::CountyPlace {
                nation,
                county,
                place,
                locality,
            } => {
                let nation = self.nation(nation);
                let entry = nation.entries.entry(county.clone()).or_default();
                entry.total += 1;
                match (place, locality) {
                    (Some(place), Some(locality)) => {
                        *entry.places.entry(format!("{}, {}", locality, place)).or_default() += 1
                    }
                    (Some(place), None) => *entry.places.entry(place.clone()).or_default() += 1,
                    (None, _) => entry.unlisted += 1,
                }
            }
            PlaceClass::Nation { nation } => self.nation(nation).nation_only += 1,
            PlaceClass::Unclassified { original } => {
                *self.unclassified.entry(original.trim().to_string()).or_default() += 1
            }
        }
    }

    fn nation(&mut self, nation: &str) -> &mut NationTally {
        let tally = self.nations.entry(nation.to_string()).or_default();
        tally.total += 1;
        tally
    }

    pub fn classified_count(&self) -> usize {
        self.nations.values().map(|n| n.total).sum()
    }

    pub fn unclassified_count(&self) -> usize {
        self.unclassified.values().sum()
    }
}

/// Two records name the same place when they classify identically, or when
/// neither classifies and the normalized text matches
fn same_place(a: &ClassifiedBirthplace, b: &ClassifiedBirthplace) -> bool {
    match (&a.classification.class, &b.classification.class) {
        (PlaceClass::Unclassified { .. }, PlaceClass::Unclassified { .. }) => {
            a.field.normalized == b.field.normalized
        }
        (x, y) => x == y,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTally {
    pub total: usize,
    /// Display name with pattern annotations → count
    pub variants: BTreeMap<String, usize>,
}

/// Occupation counts for a set of individuals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupationReport {
    pub individuals: usize,
    /// Individuals with at least one extracted occupation
    pub with_occupation: usize,
    pub groups: BTreeMap<String, GroupTally>,
    /// Original text → count
    pub unclassified: BTreeMap<String, usize>,
}

impl OccupationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one individual's classified occupations; each distinct
    /// occupation counts once per individual
    pub fn add_person(&mut self, records: Vec<ClassifiedOccupation>) {
        self.individuals += 1;
        if records.is_empty() {
            return;
        }
        self.with_occupation += 1;

        let mut seen: Vec<String> = Vec::new();
        for record in records {
            let key = match &record.class {
                OccupationClass::Group { .. } => record.class.display_name(),
                OccupationClass::Unclassified { .. } => record.field.normalized.clone(),
            };
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);

            match record.class {
                OccupationClass::Group { ref name, .. } => {
                    let tally = self.groups.entry(name.clone()).or_default();
                    tally.total += 1;
                    *tally.variants.entry(record.class.display_name()).or_default() += 1;
                }
                OccupationClass::Unclassified { original } => {
                    *self.unclassified.entry(original.trim().to_string()).or_default() += 1;
                }
            }
        }
    }

    pub fn classified_count(&self) -> usize {
        self.groups.values().map(|g| g.total).sum()
    }

    pub fn unclassified_count(&self) -> usize {
        self.unclassified.values().sum()
    }
}
