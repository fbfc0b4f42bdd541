use crate::types::tree::LayerSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Directory under the temp root that holds every artifact of a run.
pub const TEST_FOLDER_NAME: &str = "tests.io.db";

/// Harness configuration, optionally persisted as TOML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub budget_mode: BudgetMode,
    /// Worker thread count. `None` uses rayon's default.
    pub workers: Option<usize>,
    /// Parent of the test folder. `None` uses the system temp directory.
    pub temp_root: Option<PathBuf>,
    pub budgets: Budgets,
    pub layers: Vec<LayerSpec>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            budget_mode: BudgetMode::default(),
            workers: None,
            temp_root: None,
            budgets: Budgets::default(),
            layers: default_layers(),
        }
    }
}

impl BenchConfig {
    /// Loads config from a TOML file. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the list of validation errors; empty if the config is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.layers.is_empty() {
            errors.push("at least one layer is required".to_string());
        }

        for (i, layer) in self.layers.iter().enumerate() {
            if layer.name.trim().is_empty() {
                errors.push(format!("layer {} has an empty name", i + 1));
            }
            if layer.node_count == 0 {
                errors.push(format!("layer {} must have at least 1 node", i + 1));
            }
        }

        if self.workers == Some(0) {
            errors.push("workers must be at least 1".to_string());
        }

        errors
    }

    pub fn test_folder(&self) -> PathBuf {
        self.temp_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
            .join(TEST_FOLDER_NAME)
    }
}

/// Per-phase latency budgets in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budgets {
    #[serde(default = "default_insert_ms")]
    pub insert_ms: u64,
    #[serde(default = "default_read_ms")]
    pub read_ms: u64,
    #[serde(default = "default_file_write_ms")]
    pub file_write_ms: u64,
    #[serde(default = "default_file_read_ms")]
    pub file_read_ms: u64,
}

impl Default for Budgets {
    fn default() -> Self {
        Self {
            insert_ms: default_insert_ms(),
            read_ms: default_read_ms(),
            file_write_ms: default_file_write_ms(),
            file_read_ms: default_file_read_ms(),
        }
    }
}

impl Budgets {
    /// Same budget for every phase.
    pub fn uniform(ms: u64) -> Self {
        Self {
            insert_ms: ms,
            read_ms: ms,
            file_write_ms: ms,
            file_read_ms: ms,
        }
    }

    pub fn insert(&self) -> Duration {
        Duration::from_millis(self.insert_ms)
    }

    pub fn read(&self) -> Duration {
        Duration::from_millis(self.read_ms)
    }

    pub fn file_write(&self) -> Duration {
        Duration::from_millis(self.file_write_ms)
    }

    pub fn file_read(&self) -> Duration {
        Duration::from_millis(self.file_read_ms)
    }
}

/// What happens when a phase exceeds its budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetMode {
    /// Abort the run with `BenchError::BudgetExceeded`.
    #[default]
    Enforce,
    /// Log a warning and keep going.
    Report,
}

impl fmt::Display for BudgetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetMode::Enforce => write!(f, "enforce"),
            BudgetMode::Report => write!(f, "report"),
        }
    }
}

fn default_layers() -> Vec<LayerSpec> {
    vec![
        LayerSpec::new("1", 1000),
        LayerSpec::new("2", 2),
        LayerSpec::new("3", 4),
        LayerSpec::new("4", 1),
    ]
}

fn default_insert_ms() -> u64 {
    700
}

fn default_read_ms() -> u64 {
    200
}

fn default_file_write_ms() -> u64 {
    600
}

fn default_file_read_ms() -> u64 {
    1000
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
