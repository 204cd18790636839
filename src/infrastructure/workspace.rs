//! Workspace discovery and store selection

use crate::error::{NotesError, Result};
use crate::infrastructure::config::{Backend, Config, WORKSPACE_DIR};
use crate::infrastructure::{FileStore, KeyValueStore, RedisStore};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A directory holding a `.kvnotes` folder with the config
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Workspace { root }
    }

    /// Discover workspace root by walking up from current directory
    /// First checks KVNOTES_ROOT environment variable, then falls back to discovery
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var("KVNOTES_ROOT") {
            let path = PathBuf::from(root_path);
            if Self::has_workspace_dir(&path) {
                return Ok(Workspace::new(path));
            } else {
                return Err(NotesError::Config(format!(
                    "KVNOTES_ROOT is set to '{}' but no .kvnotes directory found. \
                    Run 'kvnotes init' in that directory or unset KVNOTES_ROOT.",
                    path.display()
                )));
            }
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover workspace root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        let found = start
            .ancestors()
            .find(|dir| Self::has_workspace_dir(dir))
            .map(|dir| Workspace::new(dir.to_path_buf()));

        found.ok_or_else(|| NotesError::NotInitialized(start.to_path_buf()))
    }

    fn has_workspace_dir(path: &Path) -> bool {
        path.join(WORKSPACE_DIR).is_dir()
    }

    pub fn is_initialized(&self) -> bool {
        Self::has_workspace_dir(&self.root)
    }

    /// Create the .kvnotes directory; fails if it already exists
    pub fn initialize(&self) -> Result<()> {
        if self.is_initialized() {
            return Err(NotesError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(self.root.join(WORKSPACE_DIR))?;
        Ok(())
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    /// Open the store the config points at
    pub fn open_store(&self, config: &Config) -> Result<Box<dyn KeyValueStore>> {
        debug!(backend = %config.backend, root = %self.root.display(), "opening store");
        match config.backend {
            Backend::Redis => Ok(Box::new(RedisStore::connect(
                &config.redis_url,
                config.timeout(),
            )?)),
            Backend::File => Ok(Box::new(FileStore::new(
                config.data_file_path(&self.root),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    fn env_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    struct EnvVarRestore {
        key: &'static str,
        previous: Option<OsString>,
    }

    impl EnvVarRestore {
        fn capture(key: &'static str) -> Self {
            Self {
                key,
                previous: std::env::var_os(key),
            }
        }
    }

    impl Drop for EnvVarRestore {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                std::env::set_var(self.key, value);
            } else {
                std::env::remove_var(self.key);
            }
        }
    }

    #[test]
    fn test_initialize_creates_workspace_dir() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::new(temp.path().to_path_buf());

        assert!(!workspace.is_initialized());
        workspace.initialize().unwrap();
        assert!(workspace.is_initialized());
        assert!(temp.path().join(".kvnotes").is_dir());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::new(temp.path().to_path_buf());

        workspace.initialize().unwrap();
        assert!(workspace.initialize().is_err());
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".kvnotes")).unwrap();

        let subdir = temp.path().join("sub").join("deep");
        fs::create_dir_all(&subdir).unwrap();

        let workspace = Workspace::discover_from(&subdir).unwrap();
        assert_eq!(workspace.root, temp.path());
    }

    #[test]
    fn test_discover_fails_when_no_workspace() {
        let temp = TempDir::new().unwrap();

        match Workspace::discover_from(temp.path()).unwrap_err() {
            NotesError::NotInitialized(path) => assert_eq!(path, temp.path()),
            e => panic!("Expected NotInitialized error, got {}", e),
        }
    }

    #[test]
    fn test_discover_with_kvnotes_root_env() {
        let _env_lock = env_test_lock().lock().unwrap();
        let _restore = EnvVarRestore::capture("KVNOTES_ROOT");

        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".kvnotes")).unwrap();

        std::env::set_var("KVNOTES_ROOT", temp.path());

        let workspace = Workspace::discover().unwrap();
        assert_eq!(workspace.root, temp.path());
    }

    #[test]
    fn test_discover_kvnotes_root_not_initialized() {
        let _env_lock = env_test_lock().lock().unwrap();
        let _restore = EnvVarRestore::capture("KVNOTES_ROOT");

        let temp = TempDir::new().unwrap();
        std::env::set_var("KVNOTES_ROOT", temp.path());

        match Workspace::discover().unwrap_err() {
            NotesError::Config(msg) => assert!(msg.contains("no .kvnotes directory")),
            e => panic!("Expected Config error, got {}", e),
        }
    }

    #[test]
    fn test_open_file_store_under_workspace() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::new(temp.path().to_path_buf());
        workspace.initialize().unwrap();

        let config = Config::new(Backend::File);
        let store = workspace.open_store(&config).unwrap();
        store.set("k", "v").unwrap();

        assert!(temp.path().join(".kvnotes").join("store.json").exists());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::new(temp.path().to_path_buf());
        workspace.initialize().unwrap();

        let config = Config::new(Backend::File);
        workspace.save_config(&config).unwrap();

        assert_eq!(workspace.load_config().unwrap().backend, Backend::File);
    }
}
