//! Generator configuration.
//!
//! The alphabet, marker, line width and insertion policy are carried in one
//! immutable [`GeneratorConfig`] value that is passed to every stage.
//!
//! Resolution order (highest priority first):
//! 1. CLI flags (applied via [`GeneratorConfig::apply_overrides`])
//! 2. TOML config file (`--config`)
//! 3. Compiled defaults

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fasta::{resolve_line_width, DEFAULT_LINE_WIDTH};
use crate::marker::InsertionPolicy;
use crate::synth::Alphabet;

/// Default extension of written record files.
pub const DEFAULT_EXTENSION: &str = "fasta";

/// Errors that can occur while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid value for '{field}': {message}")]
    Invalid { field: String, message: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings shared by every stage of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Symbols drawn during synthesis
    pub alphabet: Alphabet,
    /// Token embedded into each sequence; no insertion when absent
    pub marker: Option<String>,
    /// Body line width, 0 for a single line
    pub line_width: i64,
    /// How the marker is placed
    pub policy: InsertionPolicy,
    /// Extension of written files
    pub extension: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::dna(),
            marker: None,
            line_width: DEFAULT_LINE_WIDTH,
            policy: InsertionPolicy::default(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub alphabet: Option<Alphabet>,
    pub marker: Option<String>,
    pub line_width: Option<i64>,
    pub policy: Option<InsertionPolicy>,
}

impl GeneratorConfig {
    /// Loads a config file, or the defaults when `path` is `None`, then
    /// applies `overrides` and validates the result.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML config file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Applies CLI overrides.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(alphabet) = &overrides.alphabet {
            self.alphabet = alphabet.clone();
        }
        if let Some(marker) = &overrides.marker {
            self.marker = Some(marker.clone());
        }
        if let Some(line_width) = overrides.line_width {
            self.line_width = line_width;
        }
        if let Some(policy) = overrides.policy {
            self.policy = policy;
        }
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(marker) = &self.marker {
            if marker.is_empty() {
                return Err(ConfigError::Invalid {
                    field: "marker".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            if !marker.is_ascii() {
                return Err(ConfigError::Invalid {
                    field: "marker".to_string(),
                    message: "must be ASCII".to_string(),
                });
            }
        }
        if let Err(e) = resolve_line_width(self.line_width) {
            return Err(ConfigError::Invalid {
                field: "line_width".to_string(),
                message: e.to_string(),
            });
        }
        if self.extension.contains(['/', '\\']) {
            return Err(ConfigError::Invalid {
                field: "extension".to_string(),
                message: "must not contain path separators".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the marker to insert, if any.
    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }
}
