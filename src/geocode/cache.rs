//! Persistent geocode cache.
//!
//! A JSON object mapping canonical institution names to `[latitude,
//! longitude]` pairs. Every key present has been successfully resolved at
//! least once; entries are never overwritten in normal operation, only added.
use crate::error::{CrateError, Result};
use crate::geocode::GeoCoordinate;
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Default, PartialEq)]
pub struct GeocodeCache {
    entries: BTreeMap<String, GeoCoordinate>,
}

impl GeocodeCache {
    /// Loads the cache from disk. A missing file is an empty cache, not an
    /// error; a present but malformed file is fatal so a corrupted cache is
    /// never silently re-queried and clobbered.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let entries: BTreeMap<String, GeoCoordinate> = serde_json::from_str(&text)
                    .map_err(|source| CrateError::CacheParseError {
                        path: path.to_path_buf(),
                        source,
                    })?;
                info!("Loaded {} institutions from cache.", entries.len());
                Ok(Self { entries })
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No cache file found, will query all institutions.");
                Ok(Self::default())
            }
            Err(err) => Err(CrateError::IoError(err)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<GeoCoordinate> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Inserts a freshly resolved coordinate. Append-only: an existing entry
    /// is left untouched and `false` is returned.
    pub fn insert(&mut self, name: &str, coordinate: GeoCoordinate) -> bool {
        if self.entries.contains_key(name) {
            return false;
        }
        self.entries.insert(name.to_string(), coordinate);
        true
    }

    /// Names from `required` that are not yet cached, in input order.
    pub fn missing<'a>(&self, required: &'a [String]) -> Vec<&'a String> {
        required
            .iter()
            .filter(|name| !self.entries.contains_key(name.as_str()))
            .collect()
    }

    /// Rewrites the full cache on disk. The JSON is written to a temporary
    /// sibling and renamed into place, so the cache file is never left
    /// partially written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text =
            serde_json::to_string_pretty(&self.entries).map_err(CrateError::CacheEncodeError)?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, path)?;
        info!("Cache updated with {} institutions.", self.entries.len());
        Ok(())
    }
}
