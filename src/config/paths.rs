//! Path management for the bill splitter
//!
//! Provides XDG-compliant path resolution for configuration and data.
//!
//! ## Path Resolution Order
//!
//! 1. `BILL_SPLITTER_DATA_DIR` environment variable (if set)
//! 2. `$XDG_CONFIG_HOME/bill-splitter` (if set)
//! 3. Platform config directory (`~/.config/bill-splitter`, `%APPDATA%\bill-splitter`, ...)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::SplitterError;

pub const DATA_DIR_ENV: &str = "BILL_SPLITTER_DATA_DIR";
const APP_DIR_NAME: &str = "bill-splitter";

/// Manages all paths used by the bill splitter
#[derive(Debug, Clone)]
pub struct SplitterPaths {
    /// Base directory for all bill splitter data
    base_dir: PathBuf,
}

impl SplitterPaths {
    /// Create a new SplitterPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory can be determined.
    pub fn new() -> Result<Self, SplitterError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create SplitterPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to users.json
    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// Get the path to groups.json (groups and memberships)
    pub fn groups_file(&self) -> PathBuf {
        self.data_dir().join("groups.json")
    }

    /// Get the path to items.json (items and partitions)
    pub fn items_file(&self) -> PathBuf {
        self.data_dir().join("items.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), SplitterError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SplitterError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| SplitterError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the bill splitter has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, SplitterError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join(APP_DIR_NAME));
        }
    }

    BaseDirs::new()
        .map(|dirs| dirs.config_dir().join(APP_DIR_NAME))
        .ok_or_else(|| SplitterError::Config("Could not determine a config directory".into()))
}
