//! The optional `config.toml` file.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ChatmateError;

/// Contents of `$XDG_CONFIG_HOME/chatmate/config.toml`.
///
/// Every key is optional; unknown keys are rejected so typos surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Destination `prompts/` directory.
    pub destination: Option<String>,
    /// Directory to read chatmates from instead of the built-in set.
    pub source_dir: Option<String>,
    /// Content ceiling in bytes.
    pub max_content_bytes: Option<usize>,
}

/// Default location of the config file, from `XDG_CONFIG_HOME` or `HOME`.
pub fn default_path(env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    let base = env("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            env("HOME")
                .or_else(|| env("USERPROFILE"))
                .map(|home| PathBuf::from(home).join(".config"))
        })?;
    Some(base.join("chatmate").join("config.toml"))
}

/// Load the config file at `path`.
///
/// A missing file yields the empty config unless `required` is set.
///
/// # Errors
///
/// Returns [`ChatmateError::InvalidConfig`] for a missing required file or
/// invalid TOML, and [`ChatmateError::Io`] if the file cannot be read.
pub fn load(path: &Path, required: bool) -> Result<ConfigFile, ChatmateError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            return Ok(ConfigFile::default());
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ChatmateError::InvalidConfig(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        Err(e) => return Err(ChatmateError::io(path, e)),
    };

    toml::from_str(&content).map_err(|e| {
        ChatmateError::InvalidConfig(format!("failed to parse {}: {e}", path.display()))
    })
}
