use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub use crate::config::language::{FileExtension, Language};

pub mod language;
mod loader;

/// Example configuration embedded at compile time.
///
/// Library users can access this to generate a starter config file.
pub const EXAMPLE_CONFIG: &str = include_str!("../../runcell.example.toml");

/// Default wall-clock deadline for one execution, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid characters in file extension")]
    InvalidFileExtChars,

    #[error("failed to parse config: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("language '{0}' not found in configuration")]
    LanguageNotFound(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Config for Runcell
///
/// The language registry is read-only after loading; it is the only state
/// shared between executions.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Wall-clock deadline for one execution, in seconds.
    /// Applied uniformly regardless of language.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Directory for source artifacts.
    ///
    /// Defaults to a private subdirectory of the system temp dir.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// Language configurations keyed by language ID
    #[serde(default)]
    pub languages: HashMap<String, Language>,
}

impl Config {
    /// Create a new config with embedded default languages
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty config with no languages
    pub fn empty() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temp_dir: None,
            languages: HashMap::new(),
        }
    }

    /// Resolve a language ID to its execution strategy
    ///
    /// Cheap and side-effect-free: no file is created and no process is
    /// spawned for an unknown ID.
    pub fn get_language(&self, id: &str) -> Result<&Language, ConfigError> {
        self.languages
            .get(id)
            .ok_or_else(|| ConfigError::LanguageNotFound(id.to_string()))
    }

    /// The hard deadline applied to every execution
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Directory where source artifacts are materialized
    pub fn artifact_dir(&self) -> PathBuf {
        self.temp_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("runcell"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_toml(EXAMPLE_CONFIG).expect("embedded default config should be valid")
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
