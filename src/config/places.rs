//! Place hierarchy: nation → county → place → locality/street

use super::store::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sub-locations recorded beneath a county place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceDetails {
    /// Villages and hamlets within the place
    #[serde(default)]
    pub local2_places: Vec<String>,
    /// Streets known to belong to the place
    #[serde(default)]
    pub known_streets: Vec<String>,
}

/// The place configuration document
///
/// ```json
/// {
///   "nation_counties": { "England": ["Cheshire"] },
///   "county_places": { "Cheshire": { "Chester": { "local2_places": [], "known_streets": [] } } },
///   "nation_places": { "Wales": ["Cardiff"] },
///   "place_aliases": { "Cheshr": "Cheshire" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceHierarchy {
    #[serde(default)]
    pub nation_counties: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub county_places: BTreeMap<String, BTreeMap<String, PlaceDetails>>,
    #[serde(default)]
    pub nation_places: BTreeMap<String, Vec<String>>,
    /// Alternative spellings for nations and counties
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub place_aliases: BTreeMap<String, String>,
}

fn same(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl PlaceHierarchy {
    pub fn is_empty(&self) -> bool {
        self.nation_counties.is_empty() && self.nation_places.is_empty()
    }

    /// Canonical spelling of a configured nation
    pub fn find_nation(&self, name: &str) -> Option<&str> {
        self.nation_counties
            .keys()
            .chain(self.nation_places.keys())
            .find(|n| same(n, name))
            .map(String::as_str)
    }

    /// Canonical spelling of a configured county
    pub fn find_county(&self, name: &str) -> Option<&str> {
        self.nation_counties
            .values()
            .flatten()
            .chain(self.county_places.keys())
            .find(|c| same(c, name))
            .map(String::as_str)
    }

    /// Nations listing the county, in key order
    pub fn nations_of_county(&self, county: &str) -> Vec<&str> {
        self.nation_counties
            .iter()
            .filter(|(_, counties)| counties.iter().any(|c| same(c, county)))
            .map(|(nation, _)| nation.as_str())
            .collect()
    }

    /// Counties of a nation whose place table lists `place`
    pub fn counties_holding(&self, nation: &str, place: &str) -> Vec<&str> {
        self.nation_counties
            .iter()
            .filter(|(n, _)| same(n, nation))
            .flat_map(|(_, counties)| counties.iter())
            .filter(|county| {
                self.county_places
                    .iter()
                    .filter(|(c, _)| same(c, county))
                    .any(|(_, places)| places.keys().any(|p| same(p, place)))
            })
            .map(String::as_str)
            .collect()
    }

    pub fn is_direct_place(&self, nation: &str, place: &str) -> bool {
        self.nation_places
            .iter()
            .filter(|(n, _)| same(n, nation))
            .any(|(_, places)| places.iter().any(|p| same(p, place)))
    }

    /// Report every configuration defect.
    ///
    /// A place registered both under a county of a nation and directly under
    /// that nation is a duplicate registration. A county listed under more
    /// than one nation cannot be resolved to a single nation either.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut problems = Vec::new();

        for (nation, places) in &self.nation_places {
            for place in places {
                for county in self.counties_holding(nation, place) {
                    problems.push(ConfigError::DuplicatePlace {
                        place: place.clone(),
                        county: county.to_string(),
                        nation: nation.clone(),
                    });
                }
            }
        }

        let mut counties: Vec<&String> = self.nation_counties.values().flatten().collect();
        counties.sort();
        counties.dedup();
        for county in counties {
            let nations = self.nations_of_county(county);
            if nations.len() > 1 {
                problems.push(ConfigError::AmbiguousCounty {
                    county: county.clone(),
                    nations: nations.iter().map(|n| n.to_string()).collect(),
                });
            }
        }

        for alias in self.place_aliases.values() {
            if self.find_nation(alias).is_none() && self.find_county(alias).is_none() {
                problems.push(ConfigError::DanglingAlias(alias.clone()));
            }
        }

        problems
    }

    /// Return a copy with `place` registered.
    ///
    /// - county and nation: county place, nation and county created on demand
    /// - county only: county place, nation taken from the existing county entry
    /// - nation only: direct nation place
    ///
    /// Registering an existing place is a no-op. Registrations that would
    /// break the county/direct invariant are refused.
    pub fn with_place(
        &self,
        place: &str,
        county: Option<&str>,
        nation: Option<&str>,
    ) -> ConfigResult<PlaceHierarchy> {
        let place = place.trim();
        if place.is_empty() {
            return Err(ConfigError::MissingLocation);
        }
        let mut next = self.clone();

        match (county.map(str::trim), nation.map(str::trim)) {
            (Some(county), nation) => {
                let county = self.find_county(county).unwrap_or(county).to_string();
                let known_nations = self.nations_of_county(&county);
                let nation = match (nation, known_nations.as_slice()) {
                    (Some(requested), []) => {
                        self.find_nation(requested).unwrap_or(requested).to_string()
                    }
                    (Some(requested), known) => {
                        match known.iter().find(|n| same(n, requested)) {
                            Some(n) => n.to_string(),
                            None => {
                                return Err(ConfigError::ConflictingNation {
                                    county,
                                    existing: known[0].to_string(),
                                    requested: requested.to_string(),
                                })
                            }
                        }
                    }
                    (None, [only]) => only.to_string(),
                    (None, []) => return Err(ConfigError::UnknownCounty(county)),
                    (None, several) => {
                        return Err(ConfigError::AmbiguousCounty {
                            county,
                            nations: several.iter().map(|n| n.to_string()).collect(),
                        })
                    }
                };

                if self.is_direct_place(&nation, place) {
                    return Err(ConfigError::DuplicatePlace {
                        place: place.to_string(),
                        county,
                        nation,
                    });
                }

                let counties = next.nation_counties.entry(nation.clone()).or_default();
                if !counties.iter().any(|c| same(c, &county)) {
                    counties.push(county.clone());
                }
                let places = next.county_places.entry(county.clone()).or_default();
                if places.keys().any(|p| same(p, place)) {
                    tracing::debug!(place, county = %county, "place already registered");
                    return Ok(next);
                }
                places.insert(place.to_string(), PlaceDetails::default());
                tracing::debug!(place, county = %county, nation = %nation, "registered county place");
            }
            (None, Some(nation)) => {
                let nation = self.find_nation(nation).unwrap_or(nation).to_string();
                if let Some(county) = self.counties_holding(&nation, place).first() {
                    return Err(ConfigError::DuplicatePlace {
                        place: place.to_string(),
                        county: county.to_string(),
                        nation,
                    });
                }
                let places = next.nation_places.entry(nation.clone()).or_default();
                if places.iter().any(|p| same(p, place)) {
                    tracing::debug!(place, nation = %nation, "place already registered");
                    return Ok(next);
                }
                places.push(place.to_string());
                tracing::debug!(place, nation = %nation, "registered direct nation place");
            }
            (None, None) => return Err(ConfigError::MissingLocation),
        }

        Ok(next)
    }
}
