//! Configuration loading.
//!
//! Priority: environment variables > config.toml > built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use kasane_core::{ConsoleConfig, KasaneError, Result};

use crate::paths::KasanePaths;

pub const ENV_SERVER_URL: &str = "KASANE_SERVER_URL";
pub const ENV_PROXY_ORIGIN: &str = "KASANE_PROXY_ORIGIN";
pub const ENV_LOG: &str = "KASANE_LOG";

/// Loads [`ConsoleConfig`] from disk and the environment.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the given config file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `~/.config/kasane/config.toml`.
    pub fn new_default() -> Result<Self> {
        let path = KasanePaths::config_file().map_err(|e| KasaneError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file (if any) and applies process environment overrides.
    pub fn load(&self) -> Result<ConsoleConfig> {
        let config = self.load_file()?;
        Ok(apply_overrides(config, |key| std::env::var(key).ok()))
    }

    /// Reads the file only. A missing or blank file yields the defaults.
    pub fn load_file(&self) -> Result<ConsoleConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(ConsoleConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ConsoleConfig::default());
        }

        ConsoleConfig::from_toml_str(&content).map_err(|e| {
            KasaneError::config(format!(
                "Failed to parse configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Applies `KASANE_*` overrides; blank values are ignored.
pub fn apply_overrides(
    mut config: ConsoleConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConsoleConfig {
    let non_empty = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    if let Some(server_url) = non_empty(ENV_SERVER_URL) {
        config.server_url = server_url;
    }
    if let Some(proxy_origin) = non_empty(ENV_PROXY_ORIGIN) {
        config.proxy_origin = proxy_origin;
    }
    if let Some(log_level) = non_empty(ENV_LOG) {
        config.log_level = log_level;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use kasane_core::config::DEFAULT_SERVER_URL;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        let config = service.load_file().expect("Should fall back to defaults");
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn test_load_file_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "server_url = \"http://localhost:8080\"\nhistory_size = 20\n",
        )
        .unwrap();

        let config = ConfigService::with_path(&path).load_file().unwrap();
        assert_eq!(config.server_url, "http://localhost:8080");
        assert_eq!(config.history_size, 20);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "server_url = ").unwrap();

        let err = ConfigService::with_path(&path).load_file().unwrap_err();
        assert!(matches!(err, KasaneError::Config(ref msg) if msg.contains("config.toml")));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_SERVER_URL, "https://kasane.example.com"),
            (ENV_PROXY_ORIGIN, "  "),
            (ENV_LOG, "debug"),
        ]
        .into_iter()
        .collect();

        let config = apply_overrides(ConsoleConfig::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });
        assert_eq!(config.server_url, "https://kasane.example.com");
        assert_eq!(config.proxy_origin, ConsoleConfig::default().proxy_origin);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_no_overrides() {
        let config = apply_overrides(ConsoleConfig::default(), |_| None);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }
}
