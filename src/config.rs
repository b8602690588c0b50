//! Settings loaded from `<config dir>/flowparams/settings.json`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::constants::{form::DEFAULT_HISTORY_DEPTH, widget::PREVIEW_CHARS};
use crate::error::ConfigError;
use crate::globals::InMemoryGlobals;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// env_logger filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Where the local uploader stores picked files
    pub upload_dir: Option<PathBuf>,
    pub history_depth: usize,
    pub preview_chars: usize,
    /// Seed values for the global variable store
    pub global_variables: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            upload_dir: None,
            history_depth: DEFAULT_HISTORY_DEPTH,
            preview_chars: PREVIEW_CHARS,
            global_variables: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("flowparams").join("settings.json"))
            .ok_or(ConfigError::ConfigDirectoryUnavailable)
    }

    /// Load settings; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let text = serde_json::to_string_pretty(self).map_err(ConfigError::Encode)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    /// Upload directory, falling back to the platform data directory
    pub fn resolved_upload_dir(&self) -> PathBuf {
        self.upload_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("flowparams")
                .join("uploads")
        })
    }

    pub fn globals(&self) -> InMemoryGlobals {
        self.global_variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globals::GlobalVariables;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = Settings::default();
        settings.history_depth = 7;
        settings.global_variables.insert("KEY".into(), "v".into());
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.globals().names(), vec!["KEY".to_string()]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"log_level": "debug"}"#).unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.history_depth, DEFAULT_HISTORY_DEPTH);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(Settings::load(&path), Err(ConfigError::Parse { .. })));
    }
}
