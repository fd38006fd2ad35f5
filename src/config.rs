//! Runtime configuration: where data lives and how it is encoded.
//!
//! Values come from `config.toml` in the data directory (or an explicit file),
//! falling back to defaults for anything not set.

use crate::models::{Exporter, StorageFormat, StorageManager};
use crate::store::DEFAULT_ROOT_NAME;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub data_file: String,
    pub log_file: String,
    pub log_level: String,
    pub format: StorageFormat,
    pub export_dir: Option<PathBuf>,
    pub root_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            data_file: String::from("snippets.json"),
            log_file: String::from("snippet_organizer.log"),
            log_level: String::from("info"),
            format: StorageFormat::Json,
            export_dir: None,
            root_name: DEFAULT_ROOT_NAME.to_string(),
        }
    }
}

/// `<platform data dir>/snipvault`, or `./data` when the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("snipvault"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

impl Config {
    /// Loads configuration.
    ///
    /// An explicit `config_path` must exist. Otherwise `config.toml` inside the
    /// data directory is used when present. `data_dir` overrides whatever the
    /// file says.
    pub fn load(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let dir = data_dir.clone().unwrap_or_else(default_data_dir);
                let candidate = dir.join(CONFIG_FILE);
                if candidate.exists() {
                    Self::from_file(&candidate)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join(&self.data_file)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(&self.log_file)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("exports"))
    }

    pub fn storage(&self) -> crate::Result<StorageManager> {
        StorageManager::new(&self.data_dir, &self.data_file, self.format)
    }

    pub fn exporter(&self) -> Exporter {
        Exporter::new(self.export_dir())
    }
}
