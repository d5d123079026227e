//! Path resolution for Pitchdesk configuration and data files.
//!
//! ```text
//! ~/.config/pitchdesk/         # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/pitchdesk/    # Data directory
//! └── store.json               # Default data store snapshot
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "pitchdesk";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct PitchdeskPaths;

impl PitchdeskPaths {
    /// Returns the configuration directory (e.g. `~/.config/pitchdesk/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the data directory (e.g. `~/.local/share/pitchdesk/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default data store snapshot path.
    pub fn default_store_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("store.json"))
    }
}
