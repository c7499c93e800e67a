//! Configuration handling for ktwalk.
//!
//! Configuration lives in a `ktwalk.toml` file. Every field has a default, so
//! a missing file (or a missing section) yields the built-in behaviour.
//!
//! ```toml
//! [parse]
//! max_depth = 128
//!
//! [output]
//! format = "json"
//! show_text = true
//! max_text_width = 60
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::KtwalkError;

/// File name searched for by [`Config::load_from_dir`].
pub const CONFIG_FILE_NAME: &str = "ktwalk.toml";

/// ktwalk configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Parser settings
    #[serde(default)]
    pub parse: ParseConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Parser settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseConfig {
    /// Maximum nesting depth before the parser gives up on a region
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Output rendering format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// Pretty-printed JSON responses
    Json,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Include element source text in walk and tree output
    #[serde(default = "default_show_text")]
    pub show_text: bool,

    /// Element text longer than this (in chars) is elided
    #[serde(default = "default_max_text_width")]
    pub max_text_width: usize,
}

/// Default nesting limit for the parser.
pub const DEFAULT_MAX_DEPTH: usize = 128;

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_show_text() -> bool {
    true
}

fn default_max_text_width() -> usize {
    60
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            show_text: default_show_text(),
            max_text_width: default_max_text_width(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, KtwalkError> {
        let config: Config = toml::from_str(content)
            .map_err(|e| KtwalkError::Config(format!("failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, KtwalkError> {
        let content = fs::read_to_string(path).map_err(|e| {
            KtwalkError::Config(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_toml(&content)
    }

    /// Load `ktwalk.toml` from `dir`, or defaults if the file does not exist.
    pub fn load_from_dir(dir: &Path) -> Result<Self, KtwalkError> {
        let config_path = config_path_in(dir);
        if config_path.is_file() {
            Self::load(&config_path)
        } else {
            debug!(dir = %dir.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    fn validate(&self) -> Result<(), KtwalkError> {
        if self.parse.max_depth == 0 {
            return Err(KtwalkError::Config(
                "parse.max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Path of the config file inside `dir`.
pub fn config_path_in(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}
