//! Configuration management

use crate::error::{NotesError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const WORKSPACE_DIR: &str = ".kvnotes";
const CONFIG_FILE: &str = "config.toml";

/// Which store notes are kept in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Remote Redis server at `redis_url`
    #[default]
    Redis,
    /// Local JSON file at `data_file`
    File,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(Backend::Redis),
            "file" => Ok(Backend::File),
            _ => Err(format!(
                "Invalid backend: '{}'. Valid backends are: redis, file",
                s
            )),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Redis => write!(f, "redis"),
            Backend::File => write!(f, "file"),
        }
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_data_file() -> PathBuf {
    PathBuf::from("store.json")
}

fn default_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Relative paths resolve against the `.kvnotes` directory
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub created: DateTime<Utc>,
}

impl Config {
    /// Create a new config with default values
    pub fn new(backend: Backend) -> Self {
        Config {
            backend,
            redis_url: default_redis_url(),
            data_file: default_data_file(),
            timeout_secs: default_timeout_secs(),
            created: Utc::now(),
        }
    }

    /// Load config from .kvnotes/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(WORKSPACE_DIR).join(CONFIG_FILE);

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NotesError::NotInitialized(path.to_path_buf())
            } else {
                NotesError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| NotesError::Config(format!("Failed to parse config.toml: {}", e)))
    }

    /// Save config to .kvnotes/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let workspace_dir = path.join(WORKSPACE_DIR);
        let config_path = workspace_dir.join(CONFIG_FILE);

        if !workspace_dir.exists() {
            fs::create_dir(&workspace_dir)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| NotesError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Apply `REDIS_URL` and `KVNOTES_BACKEND` from the environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup("REDIS_URL").filter(|v| !v.trim().is_empty()) {
            self.redis_url = url;
        }

        if let Some(backend) = lookup("KVNOTES_BACKEND").filter(|v| !v.trim().is_empty()) {
            self.backend = Backend::from_str(&backend).map_err(NotesError::Config)?;
        }

        Ok(self)
    }

    /// Location of the file store for a workspace rooted at `root`
    pub fn data_file_path(&self, root: &Path) -> PathBuf {
        if self.data_file.is_absolute() {
            self.data_file.clone()
        } else {
            root.join(WORKSPACE_DIR).join(&self.data_file)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
