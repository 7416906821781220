//! Persisted user configuration.
//!
//! The configuration file is a flat JSON record:
//!
//! ```json
//! {
//!     "source": "/path/to/source",
//!     "destination": "/path/to/destination",
//!     "options": ["--progress", "-l"]
//! }
//! ```

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::paths::get_config_path;
use crate::sync::{ValidatedOptions, parse_options_text};

/// Errors that can occur while loading or saving the configuration.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Configuration file {} cannot be read: {source}", path.display())]
    #[diagnostic(code(arxive::session::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration file {} is not valid JSON: {source}", path.display())]
    #[diagnostic(
        code(arxive::session::config::parse),
        help("Fix or remove the file; missing files fall back to defaults.")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration file {} cannot be written: {source}", path.display())]
    #[diagnostic(code(arxive::session::config::write))]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No configuration directory: neither XDG_CONFIG_HOME nor HOME is set")]
    #[diagnostic(
        code(arxive::session::config::no_home),
        help("Pass --config <path> explicitly.")
    )]
    NoConfigDir,
}

/// User configuration: default directories and extra rsync options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    /// Treat a failed mirror run as fatal instead of reporting it.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub abort_on_sync_failure: bool,
}

impl Config {
    /// Resolve the default configuration path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        get_config_path().ok_or(ConfigError::NoConfigDir)
    }

    /// Load the configuration at `path`; an absent file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: io::Error::other(e),
        })?;
        fs::write(path, json).map_err(write_err)
    }

    /// Options to pass to rsync; `None` and an empty list are the same.
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    /// Replace the options from the configuration form's text field.
    ///
    /// Returns the validation result so the caller can warn about
    /// stripped defaults.
    pub fn set_options_text(&mut self, text: &str) -> ValidatedOptions {
        let validated = parse_options_text(text);
        self.options = if validated.options.is_empty() {
            None
        } else {
            Some(validated.options.clone())
        };
        validated
    }
}
