//! Config management use case

use crate::error::{NotesError, Result};
use crate::infrastructure::{Backend, Config, Workspace};
use std::path::PathBuf;
use std::str::FromStr;

const VALID_KEYS: &str = "backend, redis_url, data_file, timeout_secs, created";

/// Service for managing workspace configuration
pub struct ConfigService {
    workspace: Workspace,
}

impl ConfigService {
    pub fn new(workspace: Workspace) -> Self {
        ConfigService { workspace }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.workspace.load_config()?;

        match key {
            "backend" => Ok(config.backend.to_string()),
            "redis_url" => Ok(config.redis_url),
            "data_file" => Ok(config.data_file.display().to_string()),
            "timeout_secs" => Ok(config.timeout_secs.to_string()),
            "created" => Ok(config.created.to_rfc3339()),
            _ => Err(NotesError::Config(format!(
                "Unknown config key: '{}'. Valid keys are: {}",
                key, VALID_KEYS
            ))),
        }
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.workspace.load_config()?;

        match key {
            "backend" => {
                config.backend = Backend::from_str(value).map_err(NotesError::Config)?;
            }
            "redis_url" => {
                config.redis_url = value.to_string();
            }
            "data_file" => {
                config.data_file = PathBuf::from(value);
            }
            "timeout_secs" => {
                config.timeout_secs = value.parse().map_err(|_| {
                    NotesError::Config(format!(
                        "Invalid timeout_secs: '{}'. Expected a whole number of seconds",
                        value
                    ))
                })?;
            }
            "created" => {
                return Err(NotesError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            _ => {
                return Err(NotesError::Config(format!(
                    "Unknown config key: '{}'. Valid keys are: backend, redis_url, data_file, timeout_secs",
                    key
                )));
            }
        }

        self.workspace.save_config(&config)?;
        Ok(())
    }

    /// List all config values
    pub fn list(&self) -> Result<Config> {
        self.workspace.load_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::init::init;
    use tempfile::TempDir;

    fn service(temp: &TempDir) -> ConfigService {
        init(temp.path(), Backend::File, None).unwrap();
        ConfigService::new(Workspace::new(temp.path().to_path_buf()))
    }

    #[test]
    fn test_get_and_set_backend() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        assert_eq!(service.get("backend").unwrap(), "file");
        service.set("backend", "redis").unwrap();
        assert_eq!(service.get("backend").unwrap(), "redis");
    }

    #[test]
    fn test_set_timeout_validates() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        service.set("timeout_secs", "10").unwrap();
        assert_eq!(service.get("timeout_secs").unwrap(), "10");
        assert!(service.set("timeout_secs", "soon").is_err());
    }

    #[test]
    fn test_created_is_read_only() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        match service.set("created", "2020-01-01T00:00:00Z").unwrap_err() {
            NotesError::Config(msg) => assert!(msg.contains("read-only")),
            e => panic!("Expected Config error, got {}", e),
        }
    }

    #[test]
    fn test_unknown_key() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        assert!(service.get("color").is_err());
        assert!(service.set("color", "blue").is_err());
    }
}
