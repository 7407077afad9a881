//! Configuration management for tubemod

use crate::error::{Result, TubemodError};
use crate::types::ModerationStatus;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-local configuration file, relative to the working directory
pub const LOCAL_CONFIG_PATH: &str = ".tubemod/config.toml";

/// Largest page size the comment store accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote comment store settings
    pub store: StoreConfig,
    /// Remote classifier settings
    pub classifier: ClassifierConfig,
    /// Review console settings
    pub review: ReviewConfig,
}

/// Remote comment store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the comment store API
    pub base_url: String,
    /// Value of the `session_id` cookie issued at login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
    /// Transport timeout in seconds
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            session_cookie: None,
            timeout_secs: 30,
        }
    }
}

/// Remote classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Base URL of the classifier service
    pub base_url: String,
    /// Path of the classification endpoint
    pub endpoint: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            endpoint: "/predict".to_string(),
        }
    }
}

/// Review console configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Comments per page
    pub page_size: u32,
    /// Ask before sending a reject command
    pub confirm_reject: bool,
    /// Status used when a command does not name one
    pub default_status: ModerationStatus,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            confirm_reject: true,
            default_status: ModerationStatus::HeldForReview,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TubemodError::Io(e).with_context(format!("Failed to read {}", path.display()))
        })?;
        let config: Config = toml::from_str(&content)?;
        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Find and load configuration, then apply environment overrides.
    ///
    /// Lookup order: the explicit path, `./.tubemod/config.toml`, the
    /// platform config directory. Falls back to defaults when none exist.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::candidate_paths().into_iter().find(|p| p.exists()) {
                Some(path) => Self::load(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Paths checked by [`Config::discover`] when no explicit path is given
    pub fn candidate_paths() -> Vec<PathBuf> {
        vec![PathBuf::from(LOCAL_CONFIG_PATH), Self::user_config_path()]
    }

    /// Per-user configuration file location
    pub fn user_config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "tubemod", "tubemod")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".tubemod")
                    .join("config.toml")
            })
    }

    /// Apply `TUBEMOD_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("TUBEMOD_STORE_URL") {
            self.store.base_url = url;
        }
        if let Some(cookie) = lookup("TUBEMOD_SESSION") {
            self.store.session_cookie = Some(cookie);
        }
        if let Some(url) = lookup("TUBEMOD_CLASSIFIER_URL") {
            self.classifier.base_url = url;
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.store.base_url.trim().is_empty() {
            return Err(TubemodError::Config("store.base_url cannot be empty".to_string()));
        }
        if self.store.timeout_secs == 0 {
            return Err(TubemodError::Config(
                "store.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.classifier.base_url.trim().is_empty() {
            return Err(TubemodError::Config(
                "classifier.base_url cannot be empty".to_string(),
            ));
        }
        if self.review.page_size == 0 || self.review.page_size > MAX_PAGE_SIZE {
            return Err(TubemodError::Config(format!(
                "review.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.review.page_size
            )));
        }
        Ok(())
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write configuration to a file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store.base_url, "http://localhost:8000");
        assert_eq!(config.review.page_size, 10);
        assert!(config.review.confirm_reject);
        assert!(config.store.session_cookie.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[store]"));
        assert!(toml.contains("[review]"));
        assert!(toml.contains("default_status = \"heldForReview\""));

        let config2: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.review.page_size, config2.review.page_size);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[review]\npage_size = 25\n").unwrap();
        assert_eq!(config.review.page_size, 25);
        assert_eq!(config.classifier.endpoint, "/predict");
    }

    #[test]
    fn test_validate_page_size() {
        let mut config = Config::default();
        config.review.page_size = 0;
        assert!(config.validate().is_err());

        config.review.page_size = 101;
        assert!(config.validate().is_err());

        config.review.page_size = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout() {
        let mut config = Config::default();
        config.store.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("store.timeout_secs"));

        let loaded: Config = toml::from_str("[store]\ntimeout_secs = 0\n").unwrap();
        assert!(loaded.validate().is_err());

        config.store.timeout_secs = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TUBEMOD_STORE_URL", "https://mod.example.com"),
            ("TUBEMOD_SESSION", "abc123"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.store.base_url, "https://mod.example.com");
        assert_eq!(config.store.session_cookie.as_deref(), Some("abc123"));
        assert_eq!(config.classifier.base_url, "http://localhost:8001");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.store.session_cookie = Some("cookie".to_string());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.store.session_cookie.as_deref(), Some("cookie"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[review\npage_size = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, TubemodError::Toml(_)));
    }
}
