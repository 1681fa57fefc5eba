//! Operator-authored resolver configuration.
//!
//! Aliases, query overrides and label offsets are authored content, not
//! anything inferred at runtime. They are loaded once per run and passed into
//! the canonicalizer and geocoder as plain values.
use crate::error::{CrateError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

// Names and queries end up in a tab-separated report; embedded tabs or line
// breaks would corrupt it.
static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\t\r\n]").expect("valid control character regex"));

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Raw institution name -> canonical name (many-to-one).
    pub aliases: HashMap<String, String>,
    /// Canonical name -> alternate search string for the geocoder, used when
    /// the name alone is ambiguous or fails to resolve.
    pub query_overrides: HashMap<String, String>,
    /// Canonical name -> (dx, dy) map-label offset, degrees.
    pub label_offsets: HashMap<String, (f64, f64)>,
}

impl ResolverConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: ResolverConfig =
            serde_json::from_str(&text).map_err(|source| CrateError::ConfigParseError {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let names = self
            .aliases
            .iter()
            .flat_map(|(k, v)| [k, v])
            .chain(self.query_overrides.iter().flat_map(|(k, v)| [k, v]))
            .chain(self.label_offsets.keys());

        for name in names {
            if name.trim().is_empty() {
                return Err(CrateError::InvalidName {
                    name: name.clone(),
                    reason: "empty or whitespace-only".to_string(),
                });
            }
            if CONTROL_CHARS.is_match(name) {
                return Err(CrateError::InvalidName {
                    name: name.clone(),
                    reason: "contains tab or line break".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"{
                "aliases": {"Université de Genève": "University of Geneva"},
                "query_overrides": {"WSL": "Davos"},
                "label_offsets": {"EPFL": [0.0, 0.02]}
            }"#,
        );
        let config = ResolverConfig::load(file.path()).unwrap();
        assert_eq!(
            config.aliases.get("Université de Genève").unwrap(),
            "University of Geneva"
        );
        assert_eq!(config.query_overrides.get("WSL").unwrap(), "Davos");
        assert_eq!(config.label_offsets.get("EPFL").unwrap(), &(0.0, 0.02));
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let file = write_config(r#"{"aliases": {"Eawag": "EAWAG"}}"#);
        let config = ResolverConfig::load(file.path()).unwrap();
        assert_eq!(config.aliases.len(), 1);
        assert!(config.query_overrides.is_empty());
        assert!(config.label_offsets.is_empty());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let file = write_config(r#"{"aliasses": {}}"#);
        let result = ResolverConfig::load(file.path());
        assert!(matches!(result, Err(CrateError::ConfigParseError { .. })));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let file = write_config("{not json");
        let result = ResolverConfig::load(file.path());
        assert!(matches!(result, Err(CrateError::ConfigParseError { .. })));
    }

    #[test]
    fn test_control_characters_rejected() {
        let file = write_config(r#"{"aliases": {"Bad\tName": "EPFL"}}"#);
        let result = ResolverConfig::load(file.path());
        assert!(matches!(result, Err(CrateError::InvalidName { .. })));
    }

    #[test]
    fn test_empty_name_rejected() {
        let file = write_config(r#"{"query_overrides": {"  ": "Davos"}}"#);
        let result = ResolverConfig::load(file.path());
        assert!(
            matches!(result, Err(CrateError::InvalidName { reason, .. }) if reason.contains("empty"))
        );
    }
}
