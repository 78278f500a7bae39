//! ConfigStore: loading, validating and persisting classification tables

use super::occupations::OccupationTable;
use super::places::PlaceHierarchy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading, validating or changing configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot write config file {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Place '{place}' is registered both under {county} and directly under {nation}")]
    DuplicatePlace {
        place: String,
        county: String,
        nation: String,
    },

    #[error("County '{county}' is listed under several nations: {}", nations.join(", "))]
    AmbiguousCounty { county: String, nations: Vec<String> },

    #[error("County '{county}' belongs to {existing}, not {requested}")]
    ConflictingNation {
        county: String,
        existing: String,
        requested: String,
    },

    #[error("Unknown county '{0}'; give a nation to create it")]
    UnknownCounty(String),

    #[error("Alias target '{0}' is not a configured nation or county")]
    DanglingAlias(String),

    #[error("Occupation alias '{alias}' is claimed by several groups: {}", groups.join(", "))]
    DuplicateAlias { alias: String, groups: Vec<String> },

    #[error("A place needs a county or a nation")]
    MissingLocation,

    #[error("Configuration has no backing file")]
    NotPersisted,

    #[error("Refusing to overwrite {0}: it could not be read when loaded; fix or move it first")]
    Unreadable(PathBuf),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Locations of the two configuration documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub places: PathBuf,
    pub occupations: PathBuf,
}

impl ConfigPaths {
    /// `places.json` and `occupations.json` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            places: dir.join("places.json"),
            occupations: dir.join("occupations.json"),
        }
    }

    /// Default location (~/.config/kindred on Linux)
    pub fn default_location() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".config"));
        Self::in_dir(config_dir.join("kindred"))
    }
}

/// Outcome of [`ConfigStore::load`]: always a usable store, plus every
/// problem that was recovered from along the way
#[derive(Debug)]
pub struct ConfigLoad {
    pub store: ConfigStore,
    pub problems: Vec<ConfigError>,
}

/// Immutable classification tables for one session
///
/// Loaded once and shared by reference with every classifier. The only
/// change path is [`with_place`](Self::with_place), which returns a new store.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    places: PlaceHierarchy,
    occupations: OccupationTable,
    paths: Option<ConfigPaths>,
    /// The backing document exists but failed to read or parse; saving
    /// would replace the user's data with the empty fallback
    places_unreadable: bool,
    occupations_unreadable: bool,
}

impl ConfigStore {
    /// In-memory store with no backing files
    pub fn new(places: PlaceHierarchy, occupations: OccupationTable) -> Self {
        Self {
            places,
            occupations,
            ..Default::default()
        }
    }

    /// Load both documents.
    ///
    /// A missing or unreadable file yields empty mappings and a
    /// [`ConfigError::Load`]; malformed JSON yields empty mappings and a
    /// [`ConfigError::Parse`]. Validation findings are appended as well.
    pub fn load(paths: ConfigPaths) -> ConfigLoad {
        let mut problems = Vec::new();

        let (places, places_unreadable): (PlaceHierarchy, _) =
            read_document(&paths.places, &mut problems);
        let (occupations, occupations_unreadable): (OccupationTable, _) =
            read_document(&paths.occupations, &mut problems);

        for problem in places.validate().into_iter().chain(occupations.validate()) {
            tracing::warn!(%problem, "configuration defect");
            problems.push(problem);
        }

        tracing::debug!(
            nations = places.nation_counties.len() + places.nation_places.len(),
            groups = occupations.occupation_groups.len(),
            problems = problems.len(),
            "loaded configuration"
        );

        ConfigLoad {
            store: Self {
                places,
                occupations,
                paths: Some(paths),
                places_unreadable,
                occupations_unreadable,
            },
            problems,
        }
    }

    pub fn places(&self) -> &PlaceHierarchy {
        &self.places
    }

    pub fn occupations(&self) -> &OccupationTable {
        &self.occupations
    }

    pub fn paths(&self) -> Option<&ConfigPaths> {
        self.paths.as_ref()
    }

    /// A new store with `place` registered; `self` is left unchanged
    pub fn with_place(
        &self,
        place: &str,
        county: Option<&str>,
        nation: Option<&str>,
    ) -> ConfigResult<ConfigStore> {
        Ok(Self {
            places: self.places.with_place(place, county, nation)?,
            ..self.clone()
        })
    }

    /// Persist the place document to its backing file.
    ///
    /// Refused when the file was present but unreadable at load time.
    pub fn save_places(&self) -> ConfigResult<()> {
        let paths = self.paths.as_ref().ok_or(ConfigError::NotPersisted)?;
        if self.places_unreadable {
            return Err(ConfigError::Unreadable(paths.places.clone()));
        }
        write_document(&paths.places, &self.places)
    }

    /// Persist the occupation document to its backing file
    pub fn save_occupations(&self) -> ConfigResult<()> {
        let paths = self.paths.as_ref().ok_or(ConfigError::NotPersisted)?;
        if self.occupations_unreadable {
            return Err(ConfigError::Unreadable(paths.occupations.clone()));
        }
        write_document(&paths.occupations, &self.occupations)
    }
}

/// Read one document, falling back to empty mappings. The flag is set when
/// the file exists but could not be used.
fn read_document<T: DeserializeOwned + Default>(
    path: &Path,
    problems: &mut Vec<ConfigError>,
) -> (T, bool) {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(source) => {
            let missing = source.kind() == std::io::ErrorKind::NotFound;
            if missing {
                tracing::debug!(path = %path.display(), "config file missing; using empty mappings");
            } else {
                tracing::warn!(path = %path.display(), error = %source, "config file unreadable; using empty mappings");
            }
            problems.push(ConfigError::Load {
                path: path.to_path_buf(),
                source,
            });
            return (T::default(), !missing);
        }
    };

    match serde_json::from_str(&text) {
        Ok(value) => (value, false),
        Err(source) => {
            tracing::warn!(path = %path.display(), error = %source, "malformed config file; using empty mappings");
            problems.push(ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            });
            (T::default(), true)
        }
    }
}

/// Write via a sibling temp file so a failed write never truncates the
/// existing document
fn write_document<T: Serialize>(path: &Path, value: &T) -> ConfigResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    let save_err = |source| ConfigError::Save {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(save_err)?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(save_err)?;
    std::fs::rename(&tmp, path).map_err(save_err)?;

    tracing::debug!(path = %path.display(), "saved configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_files_fall_back_to_empty() {
        let dir = TempDir::new().unwrap();
        let load = ConfigStore::load(ConfigPaths::in_dir(dir.path()));
        assert!(load.store.places().is_empty());
        assert!(load.store.occupations().is_empty());
        assert_eq!(load.problems.len(), 2);
        assert!(load
            .problems
            .iter()
            .all(|p| matches!(p, ConfigError::Load { .. })));
    }

    #[test]
    fn test_malformed_json_reported() {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(dir.path());
        std::fs::write(&paths.places, "{ not json").unwrap();
        std::fs::write(
            &paths.occupations,
            r#"{ "occupation_groups": { "Miner": ["miner"] } }"#,
        )
        .unwrap();

        let load = ConfigStore::load(paths);
        assert!(load.store.places().is_empty());
        assert_eq!(load.store.occupations().occupation_groups.len(), 1);
        assert_eq!(load.problems.len(), 1);
        assert!(matches!(load.problems[0], ConfigError::Parse { .. }));
    }

    #[test]
    fn test_with_place_then_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(dir.path().join("nested"));
        let store = ConfigStore::load(paths.clone()).store;

        let updated = store
            .with_place("Chester", Some("Cheshire"), Some("England"))
            .unwrap();
        updated.save_places().unwrap();
        assert!(store.places().is_empty());

        let reloaded = ConfigStore::load(paths).store;
        assert_eq!(reloaded.places(), updated.places());
    }

    #[test]
    fn test_occupations_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(dir.path());
        let mut occupations = OccupationTable::default();
        occupations
            .occupation_groups
            .insert("Miner".into(), vec!["miner".into(), "collier".into()]);
        let store = ConfigStore {
            occupations,
            paths: Some(paths.clone()),
            ..Default::default()
        };
        store.save_occupations().unwrap();

        let reloaded = ConfigStore::load(paths).store;
        assert_eq!(reloaded.occupations(), store.occupations());
    }

    #[test]
    fn test_malformed_document_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(dir.path());
        std::fs::write(&paths.occupations, "[ broken").unwrap();

        let store = ConfigStore::load(paths.clone()).store;
        let err = store.save_occupations().unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable(ref path) if path == &paths.occupations));
        assert_eq!(std::fs::read_to_string(&paths.occupations).unwrap(), "[ broken");

        // The missing places document is still free to be created
        store
            .with_place("Chester", Some("Cheshire"), Some("England"))
            .unwrap()
            .save_places()
            .unwrap();
    }

    #[test]
    fn test_in_memory_store_cannot_save() {
        let store = ConfigStore::default();
        assert!(matches!(store.save_places(), Err(ConfigError::NotPersisted)));
    }
}
