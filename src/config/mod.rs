//! Classification configuration
//!
//! Two JSON documents drive classification: the place hierarchy and the
//! occupation table. Both are loaded once per session into a
//! [`ConfigStore`] and never mutated while classifying.

mod occupations;
mod places;
mod store;

pub use occupations::OccupationTable;
pub use places::{PlaceDetails, PlaceHierarchy};
pub use store::{ConfigError, ConfigLoad, ConfigPaths, ConfigResult, ConfigStore};
