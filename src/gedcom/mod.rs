//! Record-graph provider for GEDCOM files

mod parser;

pub use parser::GedcomParser;
