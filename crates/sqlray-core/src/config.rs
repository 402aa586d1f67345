//! Advisor configuration
//!
//! Loaded from `<config dir>/sqlray/config.toml`. Every field has a default,
//! so a partial file only overrides what it names.

use crate::{ConnectionTarget, Result, SqlrayError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Literal filter values recognized in natural-language questions
pub const DEFAULT_KNOWN_FILTERS: [&str; 4] = ["india", "usa", "europe", "china"];

/// Rows kept in a metrics sample
pub const DEFAULT_SAMPLE_ROW_LIMIT: usize = 5;

/// Configuration for the advisory layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Connection target for the SQL engine (`:memory:` or a file path)
    pub database: String,
    /// Filter vocabulary matched against questions
    pub known_filters: Vec<String>,
    /// Maximum rows kept in `sample_output`
    pub sample_row_limit: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            database: ConnectionTarget::MEMORY.to_string(),
            known_filters: DEFAULT_KNOWN_FILTERS.iter().map(|f| f.to_string()).collect(),
            sample_row_limit: DEFAULT_SAMPLE_ROW_LIMIT,
        }
    }
}

impl AdvisorConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the database target
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Sets the filter vocabulary. Entries are lowercased; blank entries are dropped.
    pub fn with_known_filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.known_filters = normalize_filters(filters);
        self
    }

    /// Sets the sample row limit
    pub fn with_sample_row_limit(mut self, limit: usize) -> Self {
        self.sample_row_limit = limit;
        self
    }

    /// Parsed connection target
    pub fn target(&self) -> ConnectionTarget {
        ConnectionTarget::parse(&self.database)
    }

    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("sqlray").join("config.toml"))
            .ok_or_else(|| {
                SqlrayError::Configuration("Could not determine config directory".to_string())
            })
    }

    /// Parses a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| SqlrayError::Configuration(format!("Invalid config: {}", e)))?;
        Ok(config.normalized())
    }

    /// Loads a config file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded advisor config");
        Ok(config)
    }

    /// Loads the config from the default location, falling back to defaults
    /// when no file exists there
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no advisor config, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Serializes the config to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SqlrayError::Configuration(format!("Failed to serialize config: {}", e)))
    }

    fn normalized(mut self) -> Self {
        self.known_filters = normalize_filters(&self.known_filters);
        self
    }
}

fn normalize_filters<I, S>(filters: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    filters
        .into_iter()
        .map(|f| f.as_ref().trim().to_lowercase())
        .filter(|f| !f.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::default();
        assert_eq!(config.database, ":memory:");
        assert_eq!(config.known_filters, vec!["india", "usa", "europe", "china"]);
        assert_eq!(config.sample_row_limit, 5);
        assert!(config.target().is_memory());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AdvisorConfig::from_toml_str("sample_row_limit = 10\n").unwrap();
        assert_eq!(config.sample_row_limit, 10);
        assert_eq!(config.known_filters.len(), 4);
    }

    #[test]
    fn test_filters_are_lowercased() {
        let config =
            AdvisorConfig::from_toml_str("known_filters = [\"Brazil\", \" \", \"JAPAN\"]\n")
                .unwrap();
        assert_eq!(config.known_filters, vec!["brazil", "japan"]);
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let err = AdvisorConfig::from_toml_str("sample_row_limit = \"many\"").unwrap_err();
        assert!(matches!(err, SqlrayError::Configuration(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let written = AdvisorConfig::new()
            .with_database("/data/sales.duckdb")
            .with_known_filters(["Germany"]);
        std::fs::write(&path, written.to_toml_string().unwrap()).unwrap();

        let loaded = AdvisorConfig::load_from(&path).unwrap();
        assert_eq!(loaded, written);
        assert!(!loaded.target().is_memory());
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AdvisorConfig::load_from(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SqlrayError::Io(_)));
    }
}
