use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::ai::gemini::DEFAULT_MODEL;
use crate::error::{Error, Result};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "GEMINI_MODEL";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub banner_dismissed: bool,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the default location. A missing file gives defaults; an
    /// unreadable one is reported as a configuration error.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self {
                path: Some(path.to_path_buf()),
                ..Self::new()
            });
        }

        let config_content = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Could not read {}: {}", path.display(), e))
        })?;
        let mut config: Config = serde_json::from_str(&config_content).map_err(|e| {
            Error::Configuration(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Like [`Config::load`], but falls back to defaults with a warning.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!("{}", e);
            Self::new()
        })
    }

    pub fn save(&self) -> Result<()> {
        let config_path = match &self.path {
            Some(path) => path.clone(),
            None => Self::get_config_path()?,
        };

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Configuration(format!("Could not create {}: {}", parent.display(), e))
            })?;
        }

        let config_content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Configuration(e.to_string()))?;
        fs::write(&config_path, config_content).map_err(|e| {
            Error::Configuration(format!("Could not write {}: {}", config_path.display(), e))
        })?;
        Ok(())
    }

    /// Remember that the info banner was dismissed. Persisting is best
    /// effort; failures only get logged.
    pub fn dismiss_banner(&mut self) {
        self.banner_dismissed = true;
        if let Err(e) = self.save() {
            debug!("could not persist banner dismissal: {}", e);
        }
    }

    /// API key from the command line, then the environment, then the file.
    pub fn resolve_api_key(&self, cli_key: Option<&str>) -> Option<String> {
        let env_key = std::env::var(API_KEY_ENV).ok();
        pick_non_blank([cli_key.map(str::to_string), env_key, self.api_key.clone()])
    }

    pub fn resolve_model(&self, cli_model: Option<&str>) -> String {
        let env_model = std::env::var(MODEL_ENV).ok();
        pick_non_blank([cli_model.map(str::to_string), env_model, self.model.clone()])
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            Error::Configuration("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("docprompt").join("config.json"))
    }
}

fn pick_non_blank<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.api_key.is_none());
        assert!(!config.banner_dismissed);
    }

    #[test]
    fn banner_dismissal_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::load_from(&path).unwrap();
        config.dismiss_banner();

        let reloaded = Config::load_from(&path).unwrap();
        assert!(reloaded.banner_dismissed);
    }

    #[test]
    fn dismissal_survives_unwritable_location() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let mut config = Config::load_from(&blocker.join("config.json")).unwrap();
        config.dismiss_banner();
        assert!(config.banner_dismissed);
    }

    #[test]
    fn invalid_file_is_a_configuration_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Configuration(_))));
    }

    #[test]
    fn command_line_key_wins() {
        let config = Config {
            api_key: Some("from-file".to_string()),
            ..Config::new()
        };
        assert_eq!(
            config.resolve_api_key(Some("from-cli")).as_deref(),
            Some("from-cli")
        );
    }

    #[test]
    fn blank_values_are_skipped() {
        assert_eq!(
            pick_non_blank([Some("  ".to_string()), None, Some("b".to_string())]).as_deref(),
            Some("b")
        );
    }
}
