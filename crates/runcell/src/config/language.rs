use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::config::ConfigError;

const INVALID_FILE_EXT_CHARS: [char; 2] = ['/', '.'];

/// Execution strategy for a registered language
///
/// A language is fully described by its interpreter argv and the file
/// extension its source artifacts carry. The rest of the pipeline is
/// language-agnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    /// Human-readable name for the language (e.g., "Python 3")
    pub name: String,

    /// File extension for source artifacts
    pub extension: FileExtension,

    /// Interpreter command and arguments with a {source} placeholder
    pub command: Vec<String>,

    /// Environment variables to set for the child process
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Language {
    /// Expand the {source} placeholder in the given command
    pub fn expand_command(command: &[String], source: &str) -> Vec<String> {
        command
            .iter()
            .map(|arg| arg.replace("{source}", source))
            .collect()
    }

    /// Build the argv for running the given source artifact
    pub fn command_for(&self, source: &str) -> Vec<String> {
        Self::expand_command(&self.command, source)
    }
}

/// File extension without dot (e.g., "py")
#[derive(Debug, Clone, Serialize)]
pub struct FileExtension(String);

impl FileExtension {
    pub fn new(extension: &str) -> Result<Self, ConfigError> {
        let contains_invalid = extension
            .chars()
            .any(|c| INVALID_FILE_EXT_CHARS.contains(&c));
        if contains_invalid {
            return Err(ConfigError::InvalidFileExtChars);
        }
        Ok(Self(extension.to_owned()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for FileExtension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FileExtension::new(&s).map_err(|_| {
            de::Error::invalid_value(
                de::Unexpected::Str(&s),
                &"a file extension without '/' or '.' characters",
            )
        })
    }
}

impl std::fmt::Display for FileExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
