//! Configuration for the search client.

use std::path::{Path, PathBuf};

use cord_search_api::ApiConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::query::SearchMode;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Ranking service connection settings.
    pub api: ApiConfig,
    /// Interactive search behaviour.
    pub search: SearchSettings,
}

/// Search behaviour settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Mode used until the user picks another one.
    pub default_mode: SearchMode,
}

impl ClientConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Load `path` if it exists, otherwise return the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Returns the default config file path: `<config dir>/cord-search/config.toml`.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        crate::app_dirs::config_file()
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.api
            .validate()
            .map_err(|e| ClientError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_service() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.search.default_mode, SearchMode::Or);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ClientConfig::default();
        config.api.base_url = "https://cord.example.org/api".into();
        config.api.timeout_seconds = 3;
        config.search.default_mode = SearchMode::And;

        config.save_to_file(&path).expect("save");
        let loaded = ClientConfig::from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\ndefault_mode = \"and\"\n").expect("write");

        let loaded = ClientConfig::from_file(&path).expect("load");
        assert_eq!(loaded.search.default_mode, SearchMode::And);
        assert_eq!(loaded.api, ApiConfig::default());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = ClientConfig::load_or_default(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(loaded, ClientConfig::default());
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");

        let err = ClientConfig::from_file(&path).expect_err("parse failure");
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn invalid_api_section_fails_validation() {
        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://example.org".into();
        let err = config.validate().expect_err("bad scheme");
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = ClientConfig::default_config_path();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
