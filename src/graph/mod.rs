//! Core record-graph data structures

pub mod date;
mod family;
mod genealogy;
mod individual;

#[cfg(test)]
mod tests;

pub use family::{Family, FamilyId};
pub use genealogy::{GenealogyGraph, GraphError, GraphResult};
pub use individual::{Field, Individual, IndividualId};
