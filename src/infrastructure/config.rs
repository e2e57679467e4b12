//! Sync configuration persistence

use crate::error::{Result, TcacheError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File holding the sync configuration, relative to the log directory
pub const CONFIG_FILENAME: &str = ".github-config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub enabled: bool,
    /// `owner/name`
    #[serde(default)]
    pub repository: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub auto_sync: bool,
    #[serde(default)]
    pub sync_on_start: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(default)]
    pub token: String,
}

fn default_branch() -> String {
    "main".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            enabled: false,
            repository: String::new(),
            branch: default_branch(),
            auto_sync: false,
            sync_on_start: false,
            last_sync: None,
            token: String::new(),
        }
    }
}

impl SyncConfig {
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILENAME)
    }

    /// Load config from the log directory, falling back to defaults when absent
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = Self::path_in(dir);

        let contents = match fs::read_to_string(&config_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SyncConfig::default())
            }
            Err(e) => return Err(TcacheError::Io(e)),
        };

        toml::from_str(&contents).map_err(|source| TcacheError::ConfigParse {
            file: CONFIG_FILENAME,
            source,
        })
    }

    /// Save config into the log directory
    pub fn save_to_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(Self::path_in(dir), contents)?;

        Ok(())
    }

    /// Repository and token are both present
    pub fn has_credentials(&self) -> bool {
        !self.repository.trim().is_empty() && !self.token.trim().is_empty()
    }

    /// Sync is switched on and has what it needs
    pub fn is_enabled(&self) -> bool {
        self.enabled && self.has_credentials()
    }

    /// HTTPS remote URL with the token embedded for authentication
    pub fn authenticated_url(&self) -> String {
        format!(
            "https://{}@github.com/{}.git",
            self.token.trim(),
            self.repository.trim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = SyncConfig::load_from_dir(temp.path()).unwrap();

        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.branch, "main");
        assert!(!config.enabled);
        assert!(config.last_sync.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = TempDir::new().unwrap();
        let config = SyncConfig {
            enabled: true,
            repository: "dev/logs".to_string(),
            branch: "trunk".to_string(),
            auto_sync: true,
            sync_on_start: false,
            last_sync: Some(Utc::now()),
            token: "ghp_secret".to_string(),
        };

        config.save_to_dir(temp.path()).unwrap();
        assert!(temp.path().join(CONFIG_FILENAME).exists());

        let loaded = SyncConfig::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            "repository = \"dev/logs\"\n",
        )
        .unwrap();

        let loaded = SyncConfig::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded.repository, "dev/logs");
        assert_eq!(loaded.branch, "main");
        assert!(!loaded.enabled);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILENAME), "enabled = [").unwrap();

        match SyncConfig::load_from_dir(temp.path()) {
            Err(TcacheError::ConfigParse { file, .. }) => assert_eq!(file, CONFIG_FILENAME),
            other => panic!("Expected ConfigParse error, got {:?}", other),
        }
    }

    #[test]
    fn test_is_enabled_requires_credentials() {
        let mut config = SyncConfig {
            enabled: true,
            ..SyncConfig::default()
        };
        assert!(!config.is_enabled());

        config.repository = "dev/logs".to_string();
        config.token = "t".to_string();
        assert!(config.is_enabled());

        config.enabled = false;
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_authenticated_url() {
        let config = SyncConfig {
            repository: "dev/logs".to_string(),
            token: "abc".to_string(),
            ..SyncConfig::default()
        };
        assert_eq!(config.authenticated_url(), "https://abc@github.com/dev/logs.git");
    }
}
