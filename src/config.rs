//! User configuration.
//!
//! Stored as TOML at `~/.config/proposal-search/config.toml` (or the XDG
//! equivalent). Every key is optional; command-line flags take precedence.
//!
//! # Example Configuration
//!
//! ```toml
//! corpus_path = "~/cips/.content/corpus.json"
//! default_sort = "created-desc"
//! default_limit = 20
//! snippet_length = 160
//! recent_capacity = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::search::SortOption;
use crate::search::highlight::DEFAULT_SNIPPET_LENGTH;
use crate::state::{DEFAULT_RECENT_CAPACITY, RecentItems};

const APP_DIR: &str = "proposal-search";
const CONFIG_FILE: &str = "config.toml";

/// Errors that can occur when loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Corpus JSON written by the content pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corpus_path: Option<PathBuf>,

    pub default_sort: SortOption,

    /// Cap on returned results; unlimited when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_limit: Option<usize>,

    /// Snippet window in characters.
    pub snippet_length: usize,

    pub recent_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            corpus_path: None,
            default_sort: SortOption::default(),
            default_limit: None,
            snippet_length: DEFAULT_SNIPPET_LENGTH,
            recent_capacity: DEFAULT_RECENT_CAPACITY,
        }
    }
}

impl SearchConfig {
    /// Load configuration from the default location.
    ///
    /// Returns the defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the default configuration file path.
    ///
    /// - Primary: `$XDG_CONFIG_HOME/proposal-search/config.toml`
    /// - Fallback: platform-specific config dir
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config).join(APP_DIR).join(CONFIG_FILE));
        }

        dirs::config_dir()
            .map(|p| p.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snippet_length == 0 {
            return Err(ConfigError::Validation(
                "snippet_length must be greater than 0".into(),
            ));
        }

        if self.recent_capacity == 0 {
            return Err(ConfigError::Validation(
                "recent_capacity must be greater than 0".into(),
            ));
        }

        if self.default_limit == Some(0) {
            return Err(ConfigError::Validation(
                "default_limit must be greater than 0 when set".into(),
            ));
        }

        Ok(())
    }

    /// An empty recent-items list sized by `recent_capacity`.
    pub fn recent_items(&self) -> RecentItems {
        RecentItems::with_capacity(self.recent_capacity)
    }

    /// Corpus path with a leading `~/` expanded to the home directory.
    pub fn resolved_corpus_path(&self) -> Option<PathBuf> {
        let path = self.corpus_path.as_ref()?;
        match (path.strip_prefix("~"), dirs::home_dir()) {
            (Ok(rest), Some(home)) => Some(home.join(rest)),
            _ => Some(path.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.default_sort, SortOption::NumberAsc);
        assert_eq!(config.snippet_length, 100);
        assert_eq!(config.recent_capacity, 5);
        assert!(config.corpus_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: SearchConfig = toml::from_str("default_sort = \"title-desc\"").unwrap();
        assert_eq!(config.default_sort, SortOption::TitleDesc);
        assert_eq!(config.snippet_length, DEFAULT_SNIPPET_LENGTH);
    }

    #[test]
    fn test_unknown_sort_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_sort = \"sideways\"").unwrap();
        assert!(matches!(SearchConfig::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation() {
        let config = SearchConfig {
            snippet_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SearchConfig {
            recent_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SearchConfig {
            default_limit: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_recent_items_uses_configured_capacity() {
        let config: SearchConfig = toml::from_str("recent_capacity = 2").unwrap();
        let mut recent = config.recent_items();
        assert_eq!(recent.capacity(), 2);

        for id in ["CIP-1", "CIP-30", "CPS-3"] {
            recent.touch(id);
        }
        assert_eq!(recent.ids().collect::<Vec<_>>(), vec!["CPS-3", "CIP-30"]);

        assert_eq!(SearchConfig::default().recent_items().capacity(), DEFAULT_RECENT_CAPACITY);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SearchConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = SearchConfig {
            corpus_path: Some(PathBuf::from("/data/corpus.json")),
            default_sort: SortOption::CreatedDesc,
            default_limit: Some(25),
            snippet_length: 80,
            recent_capacity: 3,
        };
        config.save_to(&path).unwrap();
        assert_eq!(SearchConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_resolved_corpus_path_plain() {
        let config = SearchConfig {
            corpus_path: Some(PathBuf::from("/abs/corpus.json")),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_corpus_path(),
            Some(PathBuf::from("/abs/corpus.json"))
        );
        assert!(SearchConfig::default().resolved_corpus_path().is_none());
    }
}
