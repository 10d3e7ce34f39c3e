//! Domain-specific error types for the chatmate engine.
//!
//! Library modules return typed errors built with [`thiserror`]; command
//! handlers at the CLI boundary convert them to [`anyhow::Error`] via the
//! standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ChatmateError
//! ├── Security(SecurityError) - name, path, size and extension checks
//! ├── Header(HeaderError)     - metadata header schema violations
//! ├── NotFound                - requested names absent from the catalog/source
//! ├── NameCollision           - two source files map to one display name
//! ├── Io                      - read/write/delete failures, surfaced verbatim
//! └── InvalidConfig           - unusable configuration values
//!
//! BatchAborted                - a batch stopped early; carries the partial report
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::artifact::BatchReport;

/// Top-level error type for chatmate operations.
#[derive(Error, Debug)]
pub enum ChatmateError {
    /// A security check rejected a name, path or payload.
    #[error(transparent)]
    Security(#[from] SecurityError),

    /// The metadata header of a chatmate is malformed or incomplete.
    #[error("invalid chatmate header: {0}")]
    Header(#[from] HeaderError),

    /// One or more requested chatmates do not exist.
    #[error("chatmate not found: {}", .0.join(", "))]
    NotFound(Vec<String>),

    /// Two source files resolve to the same display name.
    #[error("chatmates '{first}' and '{second}' collide on display name '{name}'")]
    NameCollision {
        /// The colliding display name (lower-cased).
        name: String,
        /// Source filename seen first.
        first: String,
        /// Source filename seen second.
        second: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path the operation was acting on.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is missing or out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ChatmateError {
    /// Wrap an I/O error together with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Return `true` for errors detected before any filesystem mutation
    /// (security and header checks).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Security(_) | Self::Header(_))
    }
}

/// Rejections produced by the [`security`](crate::security) validators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// The filename is empty or contains disallowed characters.
    #[error("invalid chatmate filename '{name}': {reason}")]
    InvalidName {
        /// The rejected filename.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The resolved destination path is not inside the destination root.
    #[error("path '{path}' escapes destination directory {}", root.display())]
    PathEscape {
        /// The offending filename as given.
        path: String,
        /// The destination root it was resolved against.
        root: PathBuf,
    },

    /// The content exceeds the configured size ceiling.
    #[error("content is {size} bytes, exceeding the {max}-byte limit")]
    SizeExceeded {
        /// Actual content length in bytes.
        size: usize,
        /// Configured maximum in bytes.
        max: usize,
    },

    /// The filename does not carry an allowed extension.
    #[error("'{name}' does not end with an allowed extension ({allowed})")]
    BadExtension {
        /// The rejected filename.
        name: String,
        /// Comma-separated list of allowed extensions.
        allowed: String,
    },
}

/// Violations of the chatmate metadata header schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// The content is not valid UTF-8.
    #[error("content is not valid UTF-8")]
    NotUtf8,

    /// The first line is not the `---` marker.
    #[error("missing opening '---' marker on the first line")]
    MissingOpeningMarker,

    /// No closing `---` marker follows the opening one.
    #[error("missing closing '---' marker")]
    MissingClosingMarker,

    /// A header line is not a `key: value` pair.
    #[error("line {line}: expected 'key: value', found '{content}'")]
    MalformedLine {
        /// 1-based line number within the file.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// The same key appears twice.
    #[error("duplicate header key '{0}'")]
    DuplicateKey(String),

    /// A required key is absent or empty.
    #[error("required header field '{0}' is missing or empty")]
    MissingField(&'static str),

    /// The instructions after the header are too short to be useful.
    #[error("body has {len} characters, at least {min} required")]
    BodyTooShort {
        /// Characters in the trimmed body.
        len: usize,
        /// Minimum accepted.
        min: usize,
    },
}

/// A batch install or uninstall that stopped before finishing.
///
/// Batches are not transactional: everything recorded in `report` has
/// already been applied to the destination directory.
#[derive(Error, Debug)]
#[error("batch aborted{}: {source}", failed_suffix(.failed.as_deref()))]
pub struct BatchAborted {
    /// Outcomes recorded before the batch stopped, including a
    /// `ValidationFailed` entry for the failing chatmate when applicable.
    pub report: BatchReport,
    /// Display name of the chatmate being processed when the batch stopped,
    /// `None` when it failed before reaching any chatmate.
    pub failed: Option<String>,
    /// The error that stopped the batch.
    pub source: ChatmateError,
}

impl BatchAborted {
    /// A batch that failed before processing its first chatmate.
    #[must_use]
    pub fn before_start(source: ChatmateError) -> Self {
        Self {
            report: BatchReport::default(),
            failed: None,
            source,
        }
    }
}

fn failed_suffix(failed: Option<&str>) -> String {
    failed.map_or_else(String::new, |name| format!(" at '{name}'"))
}
