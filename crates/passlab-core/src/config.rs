//! Session configuration loaded from TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings for a pipeline session. Every field has a default, so an empty
/// file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Tool name used when rendering the pipeline as a command line.
    pub tool_name: String,
    /// Start with the condensed pass list.
    pub condense: bool,
    /// Accept operations of unknown dialects in generic form.
    pub allow_unregistered: bool,
    /// `tracing` filter directive used when `PASSLAB_LOG` is unset.
    pub log_filter: String,
    /// Passes appended to the pipeline at startup.
    pub initial_passes: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tool_name: "passlab-opt".to_string(),
            condense: false,
            allow_unregistered: true,
            log_filter: "warn".to_string(),
            initial_passes: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// File looked up in the working directory when no path is given.
    pub const DEFAULT_FILE: &'static str = "passlab.toml";

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads `explicit` if given, else `passlab.toml` from the working
    /// directory if it exists, else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(Self::DEFAULT_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
