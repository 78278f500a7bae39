//! Field extraction
//!
//! Pulls birthplace and occupation strings out of an individual's
//! structural tags and free-text annotations, keeping the source tag path of
//! every value.

mod fields;
mod tags;

pub use fields::{ExtractedField, Extraction, FieldExtractor, FieldKind, MAX_FIELD_DEPTH};
pub use tags::TagKind;
