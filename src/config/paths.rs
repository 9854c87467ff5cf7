//! Path management
//!
//! Provides XDG-compliant path resolution for the configuration directory.
//!
//! ## Path Resolution Order
//!
//! 1. `PROSUMER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/prosumer-balance` or `~/.config/prosumer-balance`
//! 3. Windows: `%APPDATA%\prosumer-balance`

use std::path::PathBuf;

use crate::error::ProsumerError;

const APP_DIR: &str = "prosumer-balance";

/// Environment variable overriding the configuration directory
pub const DATA_DIR_ENV: &str = "PROSUMER_DATA_DIR";

/// Manages all paths used by the CLI host
#[derive(Debug, Clone)]
pub struct ProsumerPaths {
    /// Base directory for configuration
    base_dir: PathBuf,
}

impl ProsumerPaths {
    /// Create a new ProsumerPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, ProsumerError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create ProsumerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/prosumer-balance/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), ProsumerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ProsumerError::Io(format!("Failed to create config directory: {}", e)))
    }

    /// Check whether a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default configuration directory based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, ProsumerError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                ProsumerError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join(APP_DIR))
}

/// Resolve the default configuration directory based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, ProsumerError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| ProsumerError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR))
}
