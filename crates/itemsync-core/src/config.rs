//! Application configuration management.
//!
//! This module handles loading the application configuration:
//! the backend endpoint, request timeout, live-view buffer and an optional
//! cache directory override.
//!
//! Configuration is stored at `~/.config/itemsync/config.json`. The
//! `ITEMSYNC_ENDPOINT` environment variable overrides the endpoint.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_ITEMS_PATH, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::cache::store::DEFAULT_UPDATE_BUFFER;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "itemsync";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Item table file name inside the cache directory
const STORE_FILE: &str = "items.json";

/// Environment variable overriding `endpoint`
pub const ENDPOINT_ENV: &str = "ITEMSYNC_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend. Without one, refreshes fail and only cached
    /// items are shown.
    pub endpoint: Option<String>,
    pub items_path: String,
    pub request_timeout_secs: u64,
    pub update_buffer: usize,
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            items_path: DEFAULT_ITEMS_PATH.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            update_buffer: DEFAULT_UPDATE_BUFFER,
            cache_dir: None,
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_endpoint_override(std::env::var(ENDPOINT_ENV).ok());
        Ok(config)
    }

    /// Load from `path`; a missing file yields the defaults. A blank
    /// endpoint counts as none.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.endpoint = config.endpoint.take().filter(|e| !e.trim().is_empty());
        Ok(config)
    }

    /// A non-blank value replaces the configured endpoint.
    pub fn apply_endpoint_override(&mut self, endpoint: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = Some(endpoint);
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn store_path(&self) -> Result<PathBuf> {
        Ok(self.cache_dir()?.join(STORE_FILE))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.endpoint.is_none());
        assert_eq!(config.items_path, "api/articles");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.update_buffer, 64);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"endpoint": "https://example.com", "request_timeout_secs": 5}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("https://example.com"));
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.items_path, "api/articles");
    }

    #[test]
    fn test_blank_endpoint_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        for endpoint in [r#""""#, r#""   ""#] {
            std::fs::write(&path, format!(r#"{{"endpoint": {}}}"#, endpoint)).unwrap();
            let config = Config::load_from(&path).unwrap();
            assert!(config.endpoint.is_none(), "endpoint {} kept", endpoint);
        }
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "endpoint = nope").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_endpoint_override() {
        let mut config = Config {
            endpoint: Some("https://file.example".to_string()),
            ..Config::default()
        };

        config.apply_endpoint_override(Some("  ".to_string()));
        assert_eq!(config.endpoint.as_deref(), Some("https://file.example"));

        config.apply_endpoint_override(None);
        assert_eq!(config.endpoint.as_deref(), Some("https://file.example"));

        config.apply_endpoint_override(Some("https://env.example".to_string()));
        assert_eq!(config.endpoint.as_deref(), Some("https://env.example"));
    }

    #[test]
    fn test_cache_dir_override_sets_store_path() {
        let config = Config {
            cache_dir: Some(PathBuf::from("/tmp/itemsync-test")),
            ..Config::default()
        };
        assert_eq!(
            config.store_path().unwrap(),
            PathBuf::from("/tmp/itemsync-test/items.json")
        );
    }
}
