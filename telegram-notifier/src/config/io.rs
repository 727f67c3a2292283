//! Config file read/write.

use std::fs;
use std::path::{Path, PathBuf};

use notify_core::{NotifyError, Result};
use tracing::{debug, info};

use super::settings::Config;

const CONFIG_DIR_NAME: &str = ".notify2";
const CONFIG_FILE_NAME: &str = "config.json";

/// `~/.notify2/config.json`.
pub fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| NotifyError::Config("Cannot determine home directory".to_string()))
}

fn resolve(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

impl Config {
    /// Load and validate the config at `path`, or at [`default_config_path`] when `None`.
    pub fn from_file(path: Option<&Path>) -> Result<Self> {
        let path = resolve(path)?;
        if !path.exists() {
            return Err(NotifyError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(&path).map_err(|e| {
            NotifyError::Config(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| NotifyError::Config(format!("Invalid configuration file: {}", e)))?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Write the config as indented JSON, creating parent directories. Returns the path written.
    ///
    /// The file is written to a sibling temp file first and renamed into place.
    pub fn save_to_file(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = resolve(path)?;
        let fail = |e: &dyn std::fmt::Display| {
            NotifyError::Config(format!("Failed to save configuration: {}", e))
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| fail(&e))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| fail(&e))?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| fail(&e))?;
        fs::rename(&tmp_path, &path).map_err(|e| fail(&e))?;

        info!(path = %path.display(), "Saved config");
        Ok(path)
    }
}
