//! Configuration loading and representation.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::InfraResult;
use crate::export::write_json_pretty;

/// Overrides the configuration file location.
pub const CONFIG_ENV: &str = "LEDGERKIT_CONFIG";

pub const DEFAULT_CONFIG_PATH: &str = "ledgerkit.json";

/// Application configuration (`{app, version, debug, languages}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: String,
    pub version: f64,
    /// Lowers the default log level to `debug`.
    pub debug: bool,
    pub languages: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: "ledgerkit".to_string(),
            version: 1.0,
            debug: false,
            languages: vec!["kk".to_string(), "ru".to_string(), "en".to_string()],
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> InfraResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Written through a safe write: a failed save never truncates the old file.
    pub fn save(&self, path: impl AsRef<Path>) -> InfraResult<()> {
        write_json_pretty(path, self)
    }

    /// Load `path`, or write and return the defaults when it does not exist.
    ///
    /// The flag is `true` when the file was created.
    pub fn load_or_init(path: impl AsRef<Path>) -> InfraResult<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            return Ok((Self::load(path)?, false));
        }

        let config = Self::default();
        config.save(path)?;
        Ok((config, true))
    }
}

/// `LEDGERKIT_CONFIG`, or `ledgerkit.json` in the working directory.
pub fn config_path_from_env() -> PathBuf {
    env::var_os(CONFIG_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InfraError;

    #[test]
    fn missing_config_is_initialised_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledgerkit.json");

        let (config, created) = AppConfig::load_or_init(&path).unwrap();

        assert!(created);
        assert_eq!(config, AppConfig::default());

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["app"], "ledgerkit");
        assert_eq!(written["version"], 1.0);
        assert_eq!(written["debug"], false);
        assert_eq!(written["languages"], serde_json::json!(["kk", "ru", "en"]));
    }

    #[test]
    fn existing_config_is_loaded_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledgerkit.json");
        fs::write(
            &path,
            r#"{"app": "DemoProgram", "version": 1.0, "debug": true, "languages": ["kk"]}"#,
        )
        .unwrap();

        let (config, created) = AppConfig::load_or_init(&path).unwrap();

        assert!(!created);
        assert_eq!(config.app, "DemoProgram");
        assert!(config.debug);
        assert_eq!(config.languages, vec!["kk".to_string()]);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        let config = AppConfig {
            app: "ledgerkit-test".to_string(),
            version: 2.5,
            debug: true,
            languages: vec!["en".to_string()],
        };

        config.save(&path).unwrap();

        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn malformed_config_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(AppConfig::load(&path), Err(InfraError::Json(_))));
        assert!(matches!(AppConfig::load_or_init(&path), Err(InfraError::Json(_))));
    }
}
