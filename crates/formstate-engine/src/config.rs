//! # Engine Configuration
//!
//! [`FormConfig`] carries the knobs recognised by the engine. Every field
//! has a default, so a configuration document only needs to name what it
//! overrides. Documents may be YAML or JSON (JSON is a YAML subset).
//!
//! ```yaml
//! id_prefix: signup
//! live_validate: true
//! omit_extra_data: true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading a configuration document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML/JSON or has unknown fields.
    #[error("invalid config '{origin}': {reason}")]
    Parse { origin: String, reason: String },
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    /// Identifier of the root node; every id starts with it.
    pub id_prefix: String,
    /// Separator placed between id segments.
    pub id_separator: String,
    /// Validate on every change instead of only on submit.
    pub live_validate: bool,
    /// Prune values that no schema field addresses before submitting.
    pub omit_extra_data: bool,
    /// Skip validation entirely.
    pub no_validate: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            id_prefix: "root".to_string(),
            id_separator: "_".to_string(),
            live_validate: false,
            omit_extra_data: false,
            no_validate: false,
        }
    }
}

impl FormConfig {
    /// Parse a YAML or JSON configuration document.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        parse(content, "<inline>")
    }

    /// Load a YAML or JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        parse(&content, &path.display().to_string())
    }
}

fn parse(content: &str, origin: &str) -> Result<FormConfig, ConfigError> {
    // An empty document means "all defaults".
    if content.trim().is_empty() {
        return Ok(FormConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
        origin: origin.to_string(),
        reason: e.to_string(),
    })
}
