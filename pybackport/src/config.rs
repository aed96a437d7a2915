//! Transcoder configuration.
//!
//! Carries the names the statement downgrader recognizes and the method
//! name the interpolation rewriter appends. Defaults match the embedded
//! host interpreter; overrides come from the environment or a TOML file.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Routine names downgraded to statement form when invoked with a single
/// unnamed argument
const DEFAULT_STATEMENT_ROUTINES: &[&str] = &["print"];

/// Method appended to a de-interpolated literal to substitute positional
/// arguments
const DEFAULT_COMPOSITION_METHOD: &str = "format";

/// Cached default configuration (built once)
static DEFAULT_CONFIG: Lazy<TranscoderConfig> = Lazy::new(TranscoderConfig::default);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscoderConfig {
    /// Bare-word routine names rewritten to the legacy statement form
    pub statement_routines: Vec<String>,
    /// Composition-call method name appended after interpolation rewriting
    pub composition_method: String,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            statement_routines: DEFAULT_STATEMENT_ROUTINES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            composition_method: DEFAULT_COMPOSITION_METHOD.to_string(),
        }
    }
}

impl TranscoderConfig {
    /// The shared default configuration
    pub fn shared_default() -> &'static TranscoderConfig {
        &DEFAULT_CONFIG
    }

    /// Build a configuration from the environment.
    ///
    /// `PYBACKPORT_STATEMENT_ROUTINES` is a comma-separated name list;
    /// `PYBACKPORT_COMPOSITION_METHOD` overrides the composition method.
    /// Unset or empty variables leave the defaults in place.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = env::var("PYBACKPORT_STATEMENT_ROUTINES") {
            let routines = split_name_list(&raw);
            if !routines.is_empty() {
                config.statement_routines = routines;
            }
        }
        if let Ok(raw) = env::var("PYBACKPORT_COMPOSITION_METHOD") {
            let name = raw.trim();
            if !name.is_empty() {
                config.composition_method = name.to_string();
            }
        }
        config
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

fn split_name_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, message: String },
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "cannot read config {}: {}", path.display(), message)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "invalid config {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
