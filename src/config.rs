//! `taskdeck.toml`: slot name and task-state taxonomy for a data directory.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{RootState, COMPLETED_STATE, DEFAULT_TASK_STATES};
use crate::storage::DEFAULT_SLOT;

/// Config file name inside the data directory
pub const CONFIG_FILE: &str = "taskdeck.toml";

/// Fallback data directory when no platform directory is available
pub const FALLBACK_DATA_DIR: &str = ".taskdeck";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub tasks: TasksConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Name of the slot holding the board state
    #[serde(default = "default_slot")]
    pub slot: String,
}

fn default_slot() -> String {
    DEFAULT_SLOT.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            slot: default_slot(),
        }
    }
}

/// Task-state taxonomy for boards that start from the seed state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Allowed task states, in display order
    #[serde(default = "default_task_states")]
    pub states: Vec<String>,

    /// State counted as completed on the dashboard
    #[serde(default = "default_completed_state")]
    pub completed_state: String,
}

fn default_task_states() -> Vec<String> {
    DEFAULT_TASK_STATES.iter().map(|s| s.to_string()).collect()
}

fn default_completed_state() -> String {
    COMPLETED_STATE.to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            states: default_task_states(),
            completed_state: default_completed_state(),
        }
    }
}

impl Config {
    /// Load configuration from a `taskdeck.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Seed state built from the configured taxonomy.
    pub fn default_state(&self) -> RootState {
        RootState::seed(self.tasks.states.clone())
    }

    fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        self.tasks.validate()?;
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        let slot = self.slot.trim();
        if slot.is_empty() {
            return Err(Error::InvalidConfig(
                "storage.slot cannot be empty".to_string(),
            ));
        }
        if slot != self.slot {
            return Err(Error::InvalidConfig(
                "storage.slot cannot have surrounding whitespace".to_string(),
            ));
        }
        if slot.contains(['/', '\\']) || slot == "." || slot == ".." {
            return Err(Error::InvalidConfig(format!(
                "storage.slot '{slot}' must be a plain name"
            )));
        }
        Ok(())
    }
}

impl TasksConfig {
    fn validate(&self) -> Result<()> {
        if self.states.is_empty() {
            return Err(Error::InvalidConfig(
                "tasks.states cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for state in &self.states {
            if state.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "tasks.states cannot include empty entries".to_string(),
                ));
            }
            if !seen.insert(state.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "tasks.states has duplicate entry '{state}'"
                )));
            }
        }

        if !seen.contains(self.completed_state.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "tasks.completed_state '{}' not in tasks.states",
                self.completed_state
            )));
        }

        Ok(())
    }
}

/// Resolve the data directory: explicit path, then the platform data dir,
/// then `./.taskdeck`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    directories::ProjectDirs::from("", "", "taskdeck")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}
