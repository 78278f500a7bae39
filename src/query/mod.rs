//! Queries over the record graph
//!
//! Ancestor lineage walks, name search and data-quality checks.

mod ancestors;
mod search;
mod types;
pub mod validity;

pub use ancestors::AncestorQuery;
pub use search::{PersonSearch, SortOrder};
pub use types::{AncestorSet, Cycle, PersonSummary, YearRange};
pub use validity::AgeAnomaly;
