//! Hierarchical place classification with fuzzy fallback

use super::normalize::{normalize_text, place_tokens};
use crate::config::PlaceHierarchy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// Minimum normalized Levenshtein similarity for a fuzzy correction
pub const FUZZY_THRESHOLD: f64 = 0.8;

/// Where a place string landed in the hierarchy
///
/// Direct nation places and county places are siblings at a nation's top
/// display level; the variant only records how the place is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaceClass {
    DirectNationPlace {
        nation: String,
        place: String,
    },
    CountyPlace {
        nation: String,
        county: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        place: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        locality: Option<String>,
    },
    /// Only the nation could be resolved
    Nation { nation: String },
    Unclassified { original: String },
}

impl PlaceClass {
    pub fn nation(&self) -> Option<&str> {
        match self {
            Self::DirectNationPlace { nation, .. }
            | Self::CountyPlace { nation, .. }
            | Self::Nation { nation } => Some(nation),
            Self::Unclassified { .. } => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        !matches!(self, Self::Unclassified { .. })
    }
}

impl fmt::Display for PlaceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectNationPlace { nation, place } => write!(f, "{}, {}", place, nation),
            Self::CountyPlace {
                nation,
                county,
                place,
                locality,
            } => {
                let parts: Vec<&str> = [locality.as_deref(), place.as_deref()]
                    .into_iter()
                    .flatten()
                    .chain([county.as_str(), nation.as_str()])
                    .collect();
                write!(f, "{}", parts.join(", "))
            }
            Self::Nation { nation } => write!(f, "{}", nation),
            Self::Unclassified { original } => write!(f, "{}", original),
        }
    }
}

/// Classification outcome with audit flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceClassification {
    #[serde(flatten)]
    pub class: PlaceClass,
    /// Accepted only after alias or edit-distance correction
    pub fuzzy: bool,
    /// Every token up to place level was found in the hierarchy
    pub listed: bool,
}

impl PlaceClassification {
    fn unclassified(raw: &str) -> Self {
        Self {
            class: PlaceClass::Unclassified {
                original: raw.to_string(),
            },
            fuzzy: false,
            listed: false,
        }
    }
}

#[derive(Debug, Default)]
struct NationEntry {
    name: String,
    counties: BTreeSet<String>,
    places: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct CountyEntry {
    name: String,
    places: BTreeMap<String, PlaceEntry>,
}

#[derive(Debug, Default)]
struct PlaceEntry {
    name: String,
    /// Local2 places and streets, normalized → canonical
    localities: BTreeMap<String, String>,
}

impl PlaceEntry {
    fn locality(&self, tokens: &[String]) -> Option<String> {
        tokens
            .last()
            .and_then(|token| self.localities.get(token))
            .cloned()
    }
}

/// A partial or complete resolution from the exact pass
struct Resolution {
    class: PlaceClass,
    listed: bool,
}

impl Resolution {
    fn listed(class: PlaceClass) -> Self {
        Self {
            class,
            listed: true,
        }
    }

    fn into_classification(self, fuzzy: bool) -> PlaceClassification {
        PlaceClassification {
            class: self.class,
            fuzzy,
            listed: self.listed,
        }
    }
}

/// Maps raw place strings onto a [`PlaceHierarchy`].
///
/// The hierarchy is indexed by normalized name once at construction, so
/// classification is case and whitespace insensitive and never consults the
/// iteration order of the configuration maps.
#[derive(Debug, Default)]
pub struct PlaceClassifier {
    nations: BTreeMap<String, NationEntry>,
    counties: BTreeMap<String, CountyEntry>,
    /// County → nations listing it
    county_nations: BTreeMap<String, Vec<String>>,
    aliases: BTreeMap<String, String>,
    /// Every place, local2 place and street name
    known_places: BTreeSet<String>,
}

impl PlaceClassifier {
    pub fn new(hierarchy: &PlaceHierarchy) -> Self {
        let mut index = Self::default();

        for (nation, counties) in &hierarchy.nation_counties {
            let nation_key = index.nation_entry(nation);
            for county in counties {
                let county_key = normalize_text(county);
                if county_key.is_empty() {
                    continue;
                }
                if let Some(entry) = index.nations.get_mut(&nation_key) {
                    entry.counties.insert(county_key.clone());
                }
                let nations = index.county_nations.entry(county_key.clone()).or_default();
                if !nations.contains(&nation_key) {
                    nations.push(nation_key.clone());
                }
                index
                    .counties
                    .entry(county_key)
                    .or_insert_with(|| CountyEntry {
                        name: county.trim().to_string(),
                        ..Default::default()
                    });
            }
        }

        for (nation, places) in &hierarchy.nation_places {
            let nation_key = index.nation_entry(nation);
            for place in places {
                let key = normalize_text(place);
                index.known_places.insert(key.clone());
                if let Some(entry) = index.nations.get_mut(&nation_key) {
                    entry.places.insert(key, place.trim().to_string());
                }
            }
        }

        for (county, places) in &hierarchy.county_places {
            let county_entry = index
                .counties
                .entry(normalize_text(county))
                .or_insert_with(|| CountyEntry {
                    name: county.trim().to_string(),
                    ..Default::default()
                });
            for (place, details) in places {
                let mut entry = PlaceEntry {
                    name: place.trim().to_string(),
                    ..Default::default()
                };
                for locality in details.local2_places.iter().chain(&details.known_streets) {
                    let key = normalize_text(locality);
                    index.known_places.insert(key.clone());
                    entry.localities.insert(key, locality.trim().to_string());
                }
                let key = normalize_text(place);
                index.known_places.insert(key.clone());
                county_entry.places.insert(key, entry);
            }
        }

        for (alias, target) in &hierarchy.place_aliases {
            index
                .aliases
                .insert(normalize_text(alias), normalize_text(target));
        }

        index
    }

    fn nation_entry(&mut self, nation: &str) -> String {
        let key = normalize_text(nation);
        self.nations
            .entry(key.clone())
            .or_insert_with(|| NationEntry {
                name: nation.trim().to_string(),
                ..Default::default()
            });
        key
    }

    /// Classify a raw place string.
    ///
    /// Exact resolution is tried first; a fully listed exact result is final.
    /// Otherwise tokens are corrected against nations, counties and aliases
    /// and resolved again, and a success is flagged fuzzy.
    pub fn classify(&self, raw: &str) -> PlaceClassification {
        let tokens = place_tokens(raw);
        let exact = self.resolve(&tokens);
        if exact.as_ref().is_some_and(|resolution| resolution.listed) {
            return self.finish(raw, exact);
        }

        if let Some(corrected) = self.correct(&tokens) {
            if let Some(resolution) = self.resolve(&corrected) {
                if resolution.listed || exact.is_none() {
                    debug!(raw, corrected = %corrected.join(", "), "fuzzy place match");
                    return resolution.into_classification(true);
                }
            }
        }

        self.finish(raw, exact)
    }

    fn finish(&self, raw: &str, resolution: Option<Resolution>) -> PlaceClassification {
        match resolution {
            Some(resolution) => resolution.into_classification(false),
            None => {
                debug!(raw, "unclassified place");
                PlaceClassification::unclassified(raw)
            }
        }
    }

    fn resolve(&self, tokens: &[String]) -> Option<Resolution> {
        let (last, rest) = tokens.split_last()?;
        if let Some(nation) = self.nations.get(last) {
            return Some(self.within_nation(nation, rest));
        }

        // A bare county implies its nation when only one nation lists it
        match self.county_nations.get(last).map(Vec::as_slice) {
            Some([only]) => {
                let nation = self.nations.get(only)?;
                Some(self.within_county(nation, last, rest))
            }
            Some(several) if several.len() > 1 => {
                debug!(county = %last, "county listed under several nations");
                None
            }
            _ => None,
        }
    }

    fn within_nation(&self, nation: &NationEntry, rest: &[String]) -> Resolution {
        let Some((prev, before)) = rest.split_last() else {
            return Resolution::listed(PlaceClass::Nation {
                nation: nation.name.clone(),
            });
        };

        if nation.counties.contains(prev) {
            return self.within_county(nation, prev, before);
        }

        let holding: Vec<&CountyEntry> = nation
            .counties
            .iter()
            .filter_map(|key| self.counties.get(key))
            .filter(|county| county.places.contains_key(prev))
            .collect();
        if let Some(county) = holding.first() {
            if nation.places.contains_key(prev) {
                debug!(
                    place = %prev,
                    county = %county.name,
                    nation = %nation.name,
                    "place registered under a county and directly; preferring county"
                );
            }
            if holding.len() > 1 {
                debug!(place = %prev, counties = holding.len(), "place under several counties");
            }
            let entry = county.places.get(prev);
            return Resolution::listed(PlaceClass::CountyPlace {
                nation: nation.name.clone(),
                county: county.name.clone(),
                place: entry.map(|e| e.name.clone()),
                locality: entry.and_then(|e| e.locality(before)),
            });
        }

        if let Some(place) = nation.places.get(prev) {
            return Resolution::listed(PlaceClass::DirectNationPlace {
                nation: nation.name.clone(),
                place: place.clone(),
            });
        }

        Resolution {
            class: PlaceClass::Nation {
                nation: nation.name.clone(),
            },
            listed: false,
        }
    }

    fn within_county(&self, nation: &NationEntry, county_key: &str, before: &[String]) -> Resolution {
        let Some(county) = self.counties.get(county_key) else {
            return Resolution {
                class: PlaceClass::Nation {
                    nation: nation.name.clone(),
                },
                listed: false,
            };
        };
        let county_only = |listed| Resolution {
            class: PlaceClass::CountyPlace {
                nation: nation.name.clone(),
                county: county.name.clone(),
                place: None,
                locality: None,
            },
            listed,
        };

        let Some((token, rest)) = before.split_last() else {
            return county_only(true);
        };

        if let Some(entry) = county.places.get(token) {
            return Resolution::listed(PlaceClass::CountyPlace {
                nation: nation.name.clone(),
                county: county.name.clone(),
                place: Some(entry.name.clone()),
                locality: entry.locality(rest),
            });
        }

        // "Hoole, Cheshire" names a local2 place without its parent place
        let parent = county
            .places
            .values()
            .find_map(|entry| entry.localities.get(token).map(|locality| (entry, locality)));
        match parent {
            Some((entry, locality)) => Resolution::listed(PlaceClass::CountyPlace {
                nation: nation.name.clone(),
                county: county.name.clone(),
                place: Some(entry.name.clone()),
                locality: Some(locality.clone()),
            }),
            None => county_only(false),
        }
    }

    /// Tokens with nation, county and alias corrections applied, or `None`
    /// when nothing could be corrected
    fn correct(&self, tokens: &[String]) -> Option<Vec<String>> {
        let mut changed = false;
        let mut corrected = Vec::with_capacity(tokens.len());
        for token in tokens {
            match self.correction(token) {
                Some(fixed) => {
                    changed = true;
                    corrected.push(fixed);
                }
                None => corrected.push(token.clone()),
            }
        }
        changed.then_some(corrected)
    }

    fn correction(&self, token: &str) -> Option<String> {
        if self.is_known(token) {
            return None;
        }
        if let Some(target) = self.aliases.get(token) {
            return Some(target.clone());
        }

        self.candidates()
            .filter_map(|(candidate, target)| {
                let similarity = strsim::normalized_levenshtein(token, candidate);
                (similarity >= FUZZY_THRESHOLD)
                    .then(|| (strsim::levenshtein(token, candidate), candidate, target))
            })
            .min_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)))
            .map(|(_, _, target)| target.to_string())
    }

    fn is_known(&self, token: &str) -> bool {
        self.nations.contains_key(token)
            || self.counties.contains_key(token)
            || self.known_places.contains(token)
    }

    /// (spelling, normalized target) pairs considered by the fuzzy pass
    fn candidates(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nations
            .keys()
            .chain(self.county_nations.keys())
            .map(|key| (key.as_str(), key.as_str()))
            .chain(
                self.aliases
                    .iter()
                    .map(|(alias, target)| (alias.as_str(), target.as_str())),
            )
    }
}
