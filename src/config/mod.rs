//! Configuration management for onlysaidkb-mcp
//!
//! Handles loading, saving, and validating configuration from TOML files.
//! Every field falls back to an `ONLYSAIDKB_*` environment variable, so a
//! config file is optional.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Main configuration structure
///
/// Loaded once at startup and treated as read-only for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OnlysaidKB API base URL (e.g. http://localhost:8000/api/kb)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (applies to each individual call)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default model for answer generation
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default number of documents to retrieve
    #[serde(default = "default_top_k")]
    pub default_top_k: u32,

    /// Default response language code
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Path to the config file this was loaded from (internal)
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            default_model: default_model(),
            default_top_k: default_top_k(),
            default_language: default_language(),
            config_path: Self::default_config_path(),
        }
    }
}

impl Config {
    /// Get the default base directory (~/.onlysaidkb)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".onlysaidkb")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.config_path = config_path.to_path_buf();

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path, or from the default location
    /// if one exists, or from environment-seeded defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let config_path = Self::default_config_path();
                if config_path.exists() {
                    Self::load(&config_path)
                } else {
                    debug!("No config file found, using defaults");
                    let config = Config::default();
                    config.validate()?;
                    Ok(config)
                }
            }
        }
    }

    /// Save configuration to its config file path
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid base_url '{}': {}", self.base_url, e)))?;

        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }

        if self.default_top_k == 0 {
            return Err(Error::Config("default_top_k must be positive".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.base_url.starts_with("http"));
        assert!(config.timeout_secs > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.config_path = tmp.path().join("config.toml");
        config.base_url = "http://kb.example.com/api/kb".to_string();
        config.default_top_k = 10;

        config.save().unwrap();
        assert!(config.config_path.exists());

        let loaded = Config::load(&config.config_path).unwrap();
        assert_eq!(loaded.base_url, "http://kb.example.com/api/kb");
        assert_eq!(loaded.default_top_k, 10);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.base_url = "http://localhost:8000".to_string();
        assert!(config.validate().is_ok());

        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.timeout_secs = 30;
        config.default_top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_missing_path_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load_or_default(Some(&tmp.path().join("nope.toml")));
        assert!(result.is_err());
    }
}
