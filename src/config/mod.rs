//! Configuration and credential storage
//!
//! Tokens are written through to disk on every mutation, so a restarted
//! process picks up where the last one left off. Concurrent processes
//! sharing the file are last-writer-wins; there is no cross-process lock.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::auth::{TokenPair, TokenStore};

/// Default portal host for local development.
const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Environment variable overriding the configured portal host.
const API_BASE_ENV: &str = "KALOLSAVAM_API_URL";

/// Application configuration
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Portal base URL (the KALOLSAVAM_API_URL env var takes precedence)
    pub api_base: Option<String>,
    /// Stored JWT access token
    pub access_token: Option<String>,
    /// Stored JWT refresh token
    pub refresh_token: Option<String>,

    #[serde(skip)]
    path: PathBuf,
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "ekalolsavam", "kalolsavam-cli")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Load configuration from the platform config directory
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path,
                ..Self::default()
            });
        }

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let mut config: Self = toml::from_str(&content).context("Failed to parse config file")?;
        config.path = path;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let dir = self
            .path
            .parent()
            .context("Config path has no parent directory")?;
        fs::create_dir_all(dir).context("Failed to create config directory")?;

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.path, content).context("Failed to write config file")?;

        // Set restrictive permissions on config file (contains tokens)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms).context("Failed to set config permissions")?;
        }

        Ok(())
    }

    /// Portal base URL: environment override, stored value, or the local
    /// development default. Trailing slashes are dropped.
    pub fn resolved_api_base(&self) -> String {
        std::env::var(API_BASE_ENV)
            .ok()
            .or_else(|| self.api_base.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            tracing::warn!("failed to persist tokens: {:#}", e);
        }
    }
}

impl TokenStore for Config {
    fn tokens(&self) -> TokenPair {
        TokenPair {
            access: self.access_token.clone(),
            refresh: self.refresh_token.clone(),
        }
    }

    fn set_tokens(&mut self, access: Option<&str>, refresh: Option<&str>) {
        if let Some(access) = access {
            self.access_token = Some(access.to_string());
        }
        if let Some(refresh) = refresh {
            self.refresh_token = Some(refresh.to_string());
        }
        self.persist();
    }

    fn clear_tokens(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.persist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_path(dir: &TempDir) -> PathBuf {
        dir.path().join("config.toml")
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(test_path(&dir)).unwrap();
        assert!(config.tokens().is_empty());
        assert!(config.api_base.is_none());
    }

    #[test]
    fn set_tokens_writes_through_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);

        let mut config = Config::load_from(path.clone()).unwrap();
        config.set_tokens(Some("a1"), Some("r1"));

        let reloaded = Config::load_from(path).unwrap();
        let pair = reloaded.tokens();
        assert_eq!(pair.access.as_deref(), Some("a1"));
        assert_eq!(pair.refresh.as_deref(), Some("r1"));
    }

    #[test]
    fn partial_set_leaves_other_token_untouched() {
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);

        let mut config = Config::load_from(path.clone()).unwrap();
        config.set_tokens(Some("a1"), Some("r1"));
        config.set_tokens(Some("a2"), None);

        let reloaded = Config::load_from(path).unwrap();
        let pair = reloaded.tokens();
        assert_eq!(pair.access.as_deref(), Some("a2"));
        assert_eq!(pair.refresh.as_deref(), Some("r1"));
    }

    #[test]
    fn clear_tokens_empties_storage() {
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);

        let mut config = Config::load_from(path.clone()).unwrap();
        config.set_tokens(Some("a1"), Some("r1"));
        config.clear_tokens();

        assert!(config.tokens().is_empty());
        assert!(Config::load_from(path).unwrap().tokens().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn saved_config_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);

        let mut config = Config::load_from(path.clone()).unwrap();
        config.set_tokens(Some("a1"), None);

        let perms = fs::metadata(&path).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::load_from(path.clone()).unwrap();
        config.set_tokens(None, Some("r1"));
        assert!(path.exists());
    }

    #[test]
    fn api_base_falls_back_to_local_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(test_path(&dir)).unwrap();
        assert_eq!(config.resolved_api_base(), DEFAULT_API_BASE);
    }

    #[test]
    fn api_base_from_file_drops_trailing_slash() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::load_from(test_path(&dir)).unwrap();
        config.api_base = Some("https://portal.example.org/".to_string());
        assert_eq!(config.resolved_api_base(), "https://portal.example.org");
    }
}
