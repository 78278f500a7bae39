//! Synchronous query interface.
//!
//! `KindredApi` owns one record graph, one configuration store and an
//! optional lineage scope. The CLI and the integration tests go through it;
//! they never assemble extractors and classifiers by hand.

use crate::classify::{OccupationClass, OccupationClassifier, PlaceClassification, PlaceClassifier};
use crate::config::{ConfigError, ConfigStore};
use crate::extract::{Extraction, FieldExtractor, FieldKind};
use crate::graph::{GenealogyGraph, GraphError, Individual, IndividualId};
use crate::query::{
    validity, AgeAnomaly, AncestorQuery, AncestorSet, PersonSearch, PersonSummary, YearRange,
};
use crate::report::{BirthplaceReport, ClassifiedBirthplace, ClassifiedOccupation, OccupationReport};
use thiserror::Error;

/// Errors surfaced by [`KindredApi`]
#[derive(Debug, Error)]
pub enum KindredError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for API operations
pub type KindredResult<T> = Result<T, KindredError>;

/// Single entry point for analysis operations.
pub struct KindredApi {
    graph: GenealogyGraph,
    config: ConfigStore,
    places: PlaceClassifier,
    occupations: OccupationClassifier,
    extractor: FieldExtractor,
    scope: Option<AncestorSet>,
}

impl KindredApi {
    pub fn new(graph: GenealogyGraph, config: ConfigStore) -> Self {
        Self {
            places: PlaceClassifier::new(config.places()),
            occupations: OccupationClassifier::new(config.occupations()),
            extractor: FieldExtractor::new(),
            scope: None,
            graph,
            config,
        }
    }

    /// Replace the field extractor (e.g. to change the depth cap)
    pub fn with_extractor(mut self, extractor: FieldExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn graph(&self) -> &GenealogyGraph {
        &self.graph
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    // --- Lineage ---

    /// Direct ancestors of `root`, optionally filtered by birth year
    pub fn ancestors(&self, root: &IndividualId, years: Option<YearRange>) -> KindredResult<AncestorSet> {
        self.walk(AncestorQuery::from(root.clone()).years(years.unwrap_or_default()))
    }

    /// Run a fully specified ancestor query
    pub fn walk(&self, query: AncestorQuery) -> KindredResult<AncestorSet> {
        Ok(query.execute(&self.graph)?)
    }

    /// Restrict reports, searches and checks to one lineage
    pub fn set_scope(&mut self, query: AncestorQuery) -> KindredResult<&AncestorSet> {
        let set = self.walk(query)?;
        tracing::debug!(root = %set.root, members = set.len(), "lineage scope set");
        let set = self.scope.insert(set);
        Ok(&*set)
    }

    pub fn clear_scope(&mut self) {
        self.scope = None;
    }

    pub fn scope(&self) -> Option<&AncestorSet> {
        self.scope.as_ref()
    }

    /// Individuals in the current scope, or everyone when unscoped
    pub fn in_scope(&self) -> Box<dyn Iterator<Item = &Individual> + '_> {
        match &self.scope {
            Some(set) => Box::new(set.members().filter_map(|id| self.graph.individual(id))),
            None => Box::new(self.graph.individuals()),
        }
    }

    // --- Extraction and classification ---

    pub fn extract_fields(&self, id: &IndividualId, kind: FieldKind) -> KindredResult<Extraction> {
        let individual = self.graph.require_individual(id)?;
        Ok(self.extractor.extract(individual, kind))
    }

    pub fn classify_place(&self, text: &str) -> PlaceClassification {
        self.places.classify(text)
    }

    pub fn classify_occupation(&self, text: &str) -> OccupationClass {
        self.occupations.classify(text)
    }

    /// Register a place, persist the place document and reindex.
    ///
    /// The current store is only replaced once the new one is saved. An
    /// in-memory store (no backing file) is updated without saving.
    pub fn add_place(&mut self, place: &str, county: Option<&str>, nation: Option<&str>) -> KindredResult<()> {
        let updated = self.config.with_place(place, county, nation)?;
        if updated.paths().is_some() {
            updated.save_places()?;
        }
        self.places = PlaceClassifier::new(updated.places());
        self.config = updated;
        Ok(())
    }

    // --- Reports ---

    /// Classified birthplaces of one individual
    pub fn birthplaces_of(&self, individual: &Individual) -> Vec<ClassifiedBirthplace> {
        self.extractor
            .extract(individual, FieldKind::Birthplace)
            .fields
            .into_iter()
            .map(|field| ClassifiedBirthplace {
                classification: self.places.classify(&field.value),
                field,
            })
            .collect()
    }

    /// Classified occupations of one individual
    pub fn occupations_of(&self, individual: &Individual) -> Vec<ClassifiedOccupation> {
        self.extractor
            .extract(individual, FieldKind::Occupation)
            .fields
            .into_iter()
            .map(|field| ClassifiedOccupation {
                class: self.occupations.classify(&field.value),
                field,
            })
            .collect()
    }

    pub fn birthplace_report(&self) -> BirthplaceReport {
        let mut report = BirthplaceReport::new();
        for individual in self.in_scope() {
            report.add_person(PersonSummary::from(individual), self.birthplaces_of(individual));
        }
        report
    }

    pub fn occupation_report(&self) -> OccupationReport {
        let mut report = OccupationReport::new();
        for individual in self.in_scope() {
            report.add_person(self.occupations_of(individual));
        }
        report
    }

    // --- Search and checks ---

    pub fn search(&self, query: &PersonSearch) -> Vec<PersonSummary> {
        query.execute(self.in_scope())
    }

    pub fn negative_ages(&self) -> Vec<AgeAnomaly> {
        validity::negative_ages(self.in_scope())
    }

    /// Individuals without any family link.
    ///
    /// Always checks the whole graph: lineage members are linked by
    /// construction, so a scope would hide every result.
    pub fn orphans(&self) -> Vec<PersonSummary> {
        validity::orphans(&self.graph)
    }
}
