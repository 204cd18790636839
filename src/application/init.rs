//! Initialize workspace use case

use crate::error::Result;
use crate::infrastructure::{Backend, Config, Workspace};
use std::fs;
use std::path::Path;

/// Initialize a new workspace at the specified path.
pub fn init(path: &Path, backend: Backend, redis_url: Option<&str>) -> Result<Config> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let workspace = Workspace::new(path.to_path_buf());
    workspace.initialize()?;

    let mut config = Config::new(backend);
    if let Some(url) = redis_url {
        config.redis_url = url.to_string();
    }

    workspace.save_config(&config)?;

    Ok(config)
}
