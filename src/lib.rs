//! Kindred: Lineage-Scoped Birthplace and Occupation Analysis
//!
//! Reads a family tree, walks an individual's ancestry, pulls birthplace and
//! occupation values out of both structured event fields and free-text notes,
//! and classifies them against a user-maintained place hierarchy and
//! occupation table.
//!
//! # Core Concepts
//!
//! - **Record graph**: individuals, families and their nested fields
//! - **Lineage scope**: an ancestor set that restricts reports to one line
//! - **Classification**: nation / county / place resolution with fuzzy correction
//!
//! # Example
//!
//! ```
//! use kindred::{ConfigStore, GedcomParser, KindredApi};
//!
//! let graph = GedcomParser::new()
//!     .parse(b"0 @I1@ INDI\n1 NAME Ann /Platt/\n")
//!     .unwrap();
//! let api = KindredApi::new(graph, ConfigStore::default());
//! // Nothing is configured yet, so nothing classifies
//! assert!(!api.classify_place("Chester, Cheshire, England").class.is_classified());
//! ```

pub mod api;
pub mod classify;
pub mod config;
pub mod extract;
pub mod gedcom;
mod graph;
pub mod query;
pub mod report;

pub use api::{KindredApi, KindredError, KindredResult};
pub use classify::{
    OccupationClass, OccupationClassifier, PlaceClass, PlaceClassification, PlaceClassifier,
    FUZZY_THRESHOLD,
};
pub use config::{
    ConfigError, ConfigLoad, ConfigPaths, ConfigResult, ConfigStore, OccupationTable, PlaceDetails,
    PlaceHierarchy,
};
pub use extract::{ExtractedField, Extraction, FieldExtractor, FieldKind, TagKind};
pub use gedcom::GedcomParser;
pub use graph::{
    date, Family, FamilyId, Field, GenealogyGraph, GraphError, GraphResult, Individual,
    IndividualId,
};
pub use query::{
    AgeAnomaly, AncestorQuery, AncestorSet, Cycle, PersonSearch, PersonSummary, SortOrder,
    YearRange,
};
pub use report::{BirthplaceReport, OccupationReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
