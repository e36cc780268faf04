//! Viewer preferences persisted between sessions
//!
//! Stored as JSON in the user's config directory:
//! - Linux: ~/.config/raster-viewer/preferences.json
//! - macOS: ~/Library/Application Support/raster-viewer/preferences.json
//! - Windows: %APPDATA%\raster-viewer\preferences.json
//!
//! The shell loads these once at start-up and owns them from then on; the
//! image model never reads them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("preferences I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("preferences file {} is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Preferences {
    /// Directory the open dialog starts in
    pub last_directory: Option<PathBuf>,
    /// Zoom factor applied to newly opened images (1.0 = 100%)
    pub zoom: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            last_directory: None,
            zoom: 1.0,
        }
    }
}

impl Preferences {
    /// Platform location of the preferences file, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("raster-viewer");
        path.push("preferences.json");
        Some(path)
    }

    /// Read preferences from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(PreferencesError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&json).map_err(|source| PreferencesError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write preferences to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        let io_err = |source: io::Error| PreferencesError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| PreferencesError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }

    /// Remember the directory containing `file`
    pub fn remember_file(&mut self, file: &Path) {
        if let Some(parent) = file.parent() {
            self.last_directory = Some(parent.to_path_buf());
        }
    }
}
