//! Shared fixtures for kindred integration tests
//!
//! A three-generation Moss family plus one unlinked individual, and a
//! small place/occupation configuration covering England and Wales.

#![allow(dead_code)]

use kindred::{ConfigPaths, ConfigStore, GedcomParser, GenealogyGraph, KindredApi};
use std::path::Path;

/// ```text
/// William Moss (1790, London)
///   └─ John Moss (1820, "Mold, Flintshre, Wales") + Mary Jones (1825, Xyzzyville)
///        ├─ Thomas Moss (1851, Chester; note repeats it)
///        └─ Sarah Moss (1855, no birthplace)
/// Ann Platt: no family links, dies before she is born
/// ```
pub const MOSS_FAMILY: &str = "\
0 HEAD
1 CHAR UTF-8
0 @I1@ INDI
1 NAME Thomas /Moss/
1 BIRT
2 DATE 12 MAR 1851
2 PLAC Chester, Cheshire, England
1 OCCU Apprentice Blacksmith
1 NOTE Birthplace: chester,
2 CONC  cheshire, england
1 FAMC @F1@
0 @I2@ INDI
1 NAME John /Moss/
1 BIRT
2 DATE 1820
2 PLAC Mold, Flintshre, Wales
1 OCCU Blacksmith
1 FAMS @F1@
1 FAMC @F2@
0 @I3@ INDI
1 NAME Mary /Jones/
1 BIRT
2 DATE ABT 1825
2 PLAC Xyzzyville
1 NOTE Worked as a dressmaker
1 FAMS @F1@
0 @I4@ INDI
1 NAME William /Moss/
1 BIRT
2 DATE 1790
2 PLAC London, England
1 OCCU Farm Labourer
1 FAMS @F2@
0 @I5@ INDI
1 NAME Sarah /Moss/
1 BIRT
2 DATE 1855
1 FAMC @F1@
0 @I6@ INDI
1 NAME Ann /Platt/
1 BIRT
2 DATE 4 JUL 1900
1 DEAT
2 DATE 2 FEB 1890
0 @F1@ FAM
1 HUSB @I2@
1 WIFE @I3@
1 CHIL @I1@
1 CHIL @I5@
0 @F2@ FAM
1 HUSB @I4@
1 CHIL @I2@
0 TRLR
";

pub const PLACES_JSON: &str = r#"{
  "nation_counties": {
    "England": ["Cheshire", "Lancashire"],
    "Wales": ["Flintshire"]
  },
  "county_places": {
    "Cheshire": { "Chester": { "local2_places": ["Hoole"] } },
    "Flintshire": { "Mold": {} }
  },
  "nation_places": {
    "England": ["London"]
  }
}"#;

pub const OCCUPATIONS_JSON: &str = r#"{
  "occupation_groups": {
    "Blacksmith": ["blacksmith", "smith"],
    "Agricultural Labourer": ["farm labourer", "ag lab"]
  },
  "occupation_patterns": {
    "apprentice": "apprentice"
  }
}"#;

pub fn moss_graph() -> GenealogyGraph {
    GedcomParser::new()
        .parse(MOSS_FAMILY.as_bytes())
        .expect("fixture parses")
}

/// Write both configuration documents into `dir`
pub fn write_config(dir: &Path) -> ConfigPaths {
    let paths = ConfigPaths::in_dir(dir);
    std::fs::write(&paths.places, PLACES_JSON).expect("write places");
    std::fs::write(&paths.occupations, OCCUPATIONS_JSON).expect("write occupations");
    paths
}

/// In-memory configuration, never saved
pub fn memory_config() -> ConfigStore {
    ConfigStore::new(
        serde_json::from_str(PLACES_JSON).expect("places fixture"),
        serde_json::from_str(OCCUPATIONS_JSON).expect("occupations fixture"),
    )
}

pub fn moss_api() -> KindredApi {
    KindredApi::new(moss_graph(), memory_config())
}
