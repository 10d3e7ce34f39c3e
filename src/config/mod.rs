//! Runtime configuration resolved once at startup.
//!
//! Each setting is taken from the first layer that provides it: command-line
//! flags, then environment variables, then the TOML config file, then
//! built-in defaults.  The resulting [`Config`] is passed explicitly to
//! whatever needs it.
pub mod file;

use std::path::{Path, PathBuf};

use crate::error::ChatmateError;
use crate::security::{DEFAULT_MAX_CONTENT_BYTES, SecurityPolicy};
use crate::source::{DirectorySource, EmbeddedSource, SourceProvider};

/// Directory name probed in the working directory for a live source.
pub const LOCAL_SOURCE_DIR: &str = "chatmates";

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--dest`
    pub destination: Option<PathBuf>,
    /// `--source`
    pub source: Option<PathBuf>,
    /// `--config`
    pub config_file: Option<PathBuf>,
    /// `--yes`
    pub assume_yes: bool,
}

/// Where chatmates are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    /// The set compiled into the binary.
    Embedded,
    /// A directory on disk.
    Directory(PathBuf),
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Destination `prompts/` directory.
    pub destination: PathBuf,
    /// Chatmate source.
    pub source: SourceSelection,
    /// Content ceiling in bytes.
    pub max_content_bytes: usize,
    /// Skip confirmation prompts.
    pub non_interactive: bool,
}

impl Config {
    /// Resolve configuration from `overrides`, the process environment and
    /// the current directory.
    ///
    /// # Errors
    ///
    /// See [`Config::resolve`].
    pub fn from_process(overrides: &Overrides) -> Result<Self, ChatmateError> {
        let cwd = std::env::current_dir().map_err(|e| ChatmateError::io(".", e))?;
        Self::resolve(overrides, |key| std::env::var(key).ok(), &cwd)
    }

    /// Resolve configuration with an explicit environment lookup.
    ///
    /// Relative paths from flags and environment are taken relative to
    /// `cwd`; relative paths in the config file are taken relative to the
    /// file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmateError::InvalidConfig`] when no destination is
    /// configured, an explicit source is not a directory, the content
    /// ceiling is zero, or the config file is invalid.
    pub fn resolve(
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
        cwd: &Path,
    ) -> Result<Self, ChatmateError> {
        let env = |key: &str| env(key).filter(|v| !v.is_empty());
        let home = env("HOME").or_else(|| env("USERPROFILE"));
        let home = home.as_deref();

        let (config_path, required) = match overrides
            .config_file
            .clone()
            .or_else(|| env("CHATMATE_CONFIG").map(PathBuf::from))
        {
            Some(path) => (Some(cwd.join(path)), true),
            None => (file::default_path(&env), false),
        };
        let config_file = match &config_path {
            Some(path) => file::load(path, required)?,
            None => file::ConfigFile::default(),
        };
        let file_dir = config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(cwd);

        let destination = overrides
            .destination
            .as_ref()
            .map(|p| expand_path(&p.to_string_lossy(), cwd, home))
            .or_else(|| env("CHATMATE_DEST").map(|v| expand_path(&v, cwd, home)))
            .or_else(|| {
                config_file
                    .destination
                    .as_deref()
                    .map(|v| expand_path(v, file_dir, home))
            })
            .ok_or_else(|| {
                ChatmateError::InvalidConfig(
                    "no destination directory: pass --dest, set CHATMATE_DEST, or set \
                     `destination` in the config file"
                        .to_string(),
                )
            })?;

        let explicit_source = overrides
            .source
            .as_ref()
            .map(|p| expand_path(&p.to_string_lossy(), cwd, home))
            .or_else(|| env("CHATMATE_SOURCE").map(|v| expand_path(&v, cwd, home)))
            .or_else(|| {
                config_file
                    .source_dir
                    .as_deref()
                    .map(|v| expand_path(v, file_dir, home))
            });
        let source = match explicit_source {
            Some(dir) if dir.is_dir() => SourceSelection::Directory(dir),
            Some(dir) => {
                return Err(ChatmateError::InvalidConfig(format!(
                    "source {} is not a directory",
                    dir.display()
                )));
            }
            None if cwd.join(LOCAL_SOURCE_DIR).is_dir() => {
                SourceSelection::Directory(cwd.join(LOCAL_SOURCE_DIR))
            }
            None => SourceSelection::Embedded,
        };

        let max_content_bytes = config_file
            .max_content_bytes
            .unwrap_or(DEFAULT_MAX_CONTENT_BYTES);
        if max_content_bytes == 0 {
            return Err(ChatmateError::InvalidConfig(
                "max_content_bytes must be greater than zero".to_string(),
            ));
        }

        let non_interactive = overrides.assume_yes
            || env("CHATMATE_YES").is_some_and(|v| is_truthy(&v))
            || env("CI").is_some_and(|v| is_truthy(&v));

        Ok(Self {
            destination,
            source,
            max_content_bytes,
            non_interactive,
        })
    }

    /// Security policy built from this configuration.
    #[must_use]
    pub fn policy(&self) -> SecurityPolicy {
        SecurityPolicy::new(self.max_content_bytes)
    }

    /// Instantiate the configured source backend.
    #[must_use]
    pub fn source_provider(&self) -> Box<dyn SourceProvider> {
        match &self.source {
            SourceSelection::Embedded => Box::new(EmbeddedSource::bundled()),
            SourceSelection::Directory(dir) => Box::new(DirectorySource::new(dir.clone())),
        }
    }
}

/// Expand a leading `~` and anchor relative paths at `base`.
fn expand_path(raw: &str, base: &Path, home: Option<&str>) -> PathBuf {
    let expanded = match (raw.strip_prefix('~'), home) {
        (Some(""), Some(home)) => PathBuf::from(home),
        (Some(rest), Some(home)) => rest
            .strip_prefix(['/', '\\'])
            .map_or_else(|| PathBuf::from(raw), |rest| PathBuf::from(home).join(rest)),
        _ => PathBuf::from(raw),
    };
    base.join(expanded)
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
