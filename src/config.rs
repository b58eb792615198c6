//! Configuration Management
//!
//! Handles persistent configuration storage for doapi.

use crate::client::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the configured token
pub const TOKEN_ENV_VAR: &str = "DIGITALOCEAN_TOKEN";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Personal access token
    #[serde(default)]
    pub api_token: Option<String>,
    /// API base URL, ending with `/`
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-call timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("doapi").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        // The file holds a bearer token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Get effective token (env > config > empty)
    pub fn effective_token(&self) -> String {
        pick_token(std::env::var(TOKEN_ENV_VAR).ok(), self.api_token.as_deref())
    }

    pub fn effective_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn effective_timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Set token and save
    pub fn set_api_token(&mut self, token: &str) -> Result<()> {
        self.api_token = Some(token.to_string());
        self.save()
    }
}

fn pick_token(from_env: Option<String>, configured: Option<&str>) -> String {
    from_env
        .filter(|t| !t.is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.effective_base_url(), DEFAULT_API_URL);
        assert_eq!(config.effective_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_pick_token_precedence() {
        assert_eq!(pick_token(Some("env".into()), Some("file")), "env");
        assert_eq!(pick_token(Some(String::new()), Some("file")), "file");
        assert_eq!(pick_token(None, Some("file")), "file");
        assert_eq!(pick_token(None, None), "");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            api_token: Some("dop_v1_secret".to_string()),
            base_url: Some("http://127.0.0.1:9000/v2/".to_string()),
            timeout_secs: Some(5),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded, config);
        assert_eq!(loaded.effective_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_missing_or_malformed_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(Config::load_from(&path), Config::default());

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"timeout_secs": 10}"#).unwrap();
        assert_eq!(config.api_token, None);
        assert_eq!(config.effective_base_url(), DEFAULT_API_URL);
    }
}
