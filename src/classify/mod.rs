//! Place and occupation classification
//!
//! Both classifiers index their configuration once and are then read-only;
//! unmatched input is a value ([`PlaceClass::Unclassified`],
//! [`OccupationClass::Unclassified`]) carrying the original text, never an
//! error.

pub mod normalize;
mod occupation;
mod place;

pub use normalize::{normalize_place, normalize_text, place_tokens};
pub use occupation::{OccupationClass, OccupationClassifier};
pub use place::{PlaceClass, PlaceClassification, PlaceClassifier, FUZZY_THRESHOLD};
