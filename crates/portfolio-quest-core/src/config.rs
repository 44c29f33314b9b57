//! Host configuration loaded from a JSON file.
//!
//! Every field has a default, so an empty `{}` (or a missing file with
//! [`QuestConfig::load_or_default`]) yields the standard game.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use portfolio_quest_logic::rules::{ProgressionRules, RulesError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::STORAGE_KEY;
use crate::storage::is_valid_key;

const APP_DIR: &str = "portfolio-quest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestConfig {
    /// Directory for [`FileStorage`](crate::storage::FileStorage). `None`
    /// means the platform data directory.
    pub storage_dir: Option<PathBuf>,
    pub storage_key: String,
    /// Delay between submitting the start screen and the game starting.
    pub start_delay_ms: u64,
    /// Period of the `dedicated` achievement check.
    pub dedicated_poll_ms: u64,
    pub rules: ProgressionRules,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            storage_key: STORAGE_KEY.to_string(),
            start_delay_ms: 1_000,
            dedicated_poll_ms: 10_000,
            rules: ProgressionRules::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid storage key {0:?}: use ASCII letters, digits, '-' or '_'")]
    StorageKey(String),
    #[error("invalid progression rules: {}", format_rules_errors(.0))]
    Rules(Vec<RulesError>),
}

fn format_rules_errors(errors: &[RulesError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl QuestConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: QuestConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`load`](Self::load), falling back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}; using default configuration", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_key(&self.storage_key) {
            return Err(ConfigError::StorageKey(self.storage_key.clone()));
        }
        let errors = self.rules.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Rules(errors))
        }
    }

    /// Where saves go: the configured directory, else
    /// `<data_local_dir>/portfolio-quest`, else `./portfolio-quest`.
    pub fn resolved_storage_dir(&self) -> PathBuf {
        match &self.storage_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
        }
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn dedicated_poll(&self) -> Duration {
        Duration::from_millis(self.dedicated_poll_ms)
    }
}
