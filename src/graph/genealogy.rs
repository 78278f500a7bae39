//! GenealogyGraph: the in-memory individual/family network

use super::family::{Family, FamilyId};
use super::individual::{Individual, IndividualId};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

/// Errors that can occur while building or querying the record graph
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Individual not found: {0}")]
    IndividualNotFound(IndividualId),

    #[error("Family not found: {0}")]
    FamilyNotFound(FamilyId),

    #[error("Record format error at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// The record graph
///
/// Built once by the record parser and read-only for the rest of the
/// session. Individuals and families are keyed by identifier, so iteration
/// order is stable.
#[derive(Debug, Clone, Default)]
pub struct GenealogyGraph {
    individuals: BTreeMap<IndividualId, Individual>,
    families: BTreeMap<FamilyId, Family>,
    /// Families listing an individual under CHIL
    child_in: BTreeMap<IndividualId, BTreeSet<FamilyId>>,
    /// Families listing an individual under HUSB/WIFE
    parent_in: BTreeMap<IndividualId, BTreeSet<FamilyId>>,
}

impl GenealogyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an individual, replacing any with the same identifier
    pub fn add_individual(&mut self, individual: Individual) -> IndividualId {
        let id = individual.id.clone();
        self.individuals.insert(id.clone(), individual);
        id
    }

    /// Add a family, replacing any with the same identifier
    pub fn add_family(&mut self, family: Family) -> FamilyId {
        let id = family.id.clone();
        if let Some(old) = self.families.remove(&id) {
            unindex(&mut self.child_in, &old.children, &id);
            unindex(&mut self.parent_in, &old.parents, &id);
        }
        for child in &family.children {
            self.child_in.entry(child.clone()).or_default().insert(id.clone());
        }
        for parent in &family.parents {
            self.parent_in.entry(parent.clone()).or_default().insert(id.clone());
        }
        self.families.insert(id.clone(), family);
        id
    }

    pub fn individual(&self, id: &IndividualId) -> Option<&Individual> {
        self.individuals.get(id)
    }

    /// Like [`individual`](Self::individual) but reports a missing id as an error
    pub fn require_individual(&self, id: &IndividualId) -> GraphResult<&Individual> {
        self.individuals
            .get(id)
            .ok_or_else(|| GraphError::IndividualNotFound(id.clone()))
    }

    pub fn family(&self, id: &FamilyId) -> Option<&Family> {
        self.families.get(id)
    }

    pub fn individuals(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.values()
    }

    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.families.values()
    }

    pub fn individual_count(&self) -> usize {
        self.individuals.len()
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// Families in which the individual is a child.
    ///
    /// Links are honoured from either side: the individual's FAMC list or a
    /// family's CHIL list.
    pub fn families_as_child(&self, id: &IndividualId) -> Vec<&Family> {
        let own = self.individuals.get(id).map(|p| p.parent_families.as_slice());
        self.linked_families(own.unwrap_or_default(), self.child_in.get(id))
    }

    /// Families in which the individual is a parent/spouse
    pub fn families_as_spouse(&self, id: &IndividualId) -> Vec<&Family> {
        let own = self.individuals.get(id).map(|p| p.spouse_families.as_slice());
        self.linked_families(own.unwrap_or_default(), self.parent_in.get(id))
    }

    /// True when the individual belongs to any existing family, as child or
    /// as parent
    pub fn has_family(&self, id: &IndividualId) -> bool {
        let listed = |index: &BTreeMap<IndividualId, BTreeSet<FamilyId>>| {
            index.get(id).is_some_and(|families| !families.is_empty())
        };
        if listed(&self.child_in) || listed(&self.parent_in) {
            return true;
        }
        self.individuals.get(id).is_some_and(|person| {
            person
                .parent_families
                .iter()
                .chain(&person.spouse_families)
                .any(|family| self.families.contains_key(family))
        })
    }

    /// Record-side links first, then family-side links in identifier order
    fn linked_families(&self, own: &[FamilyId], listed: Option<&BTreeSet<FamilyId>>) -> Vec<&Family> {
        let mut seen: HashSet<&FamilyId> = HashSet::new();
        let mut result = Vec::new();
        for fam_id in own.iter().chain(listed.into_iter().flatten()) {
            if let Some(family) = self.families.get(fam_id) {
                if seen.insert(&family.id) {
                    result.push(family);
                }
            }
        }
        result
    }

    /// Parent identifiers, in family order, without duplicates
    pub fn parents_of(&self, id: &IndividualId) -> Vec<IndividualId> {
        let families = self.families_as_child(id);
        collect_unique(families.iter().flat_map(|f| f.parents.iter()), None)
    }

    /// Children across every family the individual heads
    pub fn children_of(&self, id: &IndividualId) -> Vec<IndividualId> {
        let families = self.families_as_spouse(id);
        collect_unique(families.iter().flat_map(|f| f.children.iter()), None)
    }

    /// Other parents in the individual's own families
    pub fn spouses_of(&self, id: &IndividualId) -> Vec<IndividualId> {
        let families = self.families_as_spouse(id);
        collect_unique(families.iter().flat_map(|f| f.parents.iter()), Some(id))
    }

    /// Other children of the families the individual was born into
    pub fn siblings_of(&self, id: &IndividualId) -> Vec<IndividualId> {
        let families = self.families_as_child(id);
        collect_unique(families.iter().flat_map(|f| f.children.iter()), Some(id))
    }
}

fn unindex(index: &mut BTreeMap<IndividualId, BTreeSet<FamilyId>>, members: &[IndividualId], family: &FamilyId) {
    for member in members {
        if let Some(families) = index.get_mut(member) {
            families.remove(family);
            if families.is_empty() {
                index.remove(member);
            }
        }
    }
}

fn collect_unique<'a>(
    ids: impl Iterator<Item = &'a IndividualId>,
    exclude: Option<&IndividualId>,
) -> Vec<IndividualId> {
    let mut seen = HashSet::new();
    ids.filter(|id| Some(*id) != exclude)
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}
