//! Where chatmates come from.
//!
//! A [`SourceProvider`] resolves the [`Catalog`] and fetches chatmate bytes.
//! Two backends exist: the table compiled into the binary
//! ([`EmbeddedSource`]) and a live directory on disk ([`DirectorySource`]).
//! The backend is chosen once from [`Config`](crate::config::Config) and
//! never re-evaluated during an operation.
pub mod directory;
pub mod embedded;

use std::fmt;

use serde::Serialize;

use crate::artifact::Catalog;
use crate::error::ChatmateError;

pub use directory::DirectorySource;
pub use embedded::EmbeddedSource;

/// Which backend a provider reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Read-only table compiled into the binary.
    Embedded,
    /// A directory on disk.
    External,
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => f.write_str("embedded"),
            Self::External => f.write_str("external"),
        }
    }
}

/// Resolves the catalog and fetches chatmate content.
#[cfg_attr(test, mockall::automock)]
pub trait SourceProvider {
    /// Backend in use.
    fn mode(&self) -> SourceMode;

    /// Human-readable location (directory path, or `built-in`).
    fn location(&self) -> String;

    /// All chatmates available from this source, sorted by display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be enumerated or two entries
    /// collide on display name.
    fn catalog(&self) -> Result<Catalog, ChatmateError>;

    /// Content of the chatmate with display name `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmateError::NotFound`] if the source has no such chatmate
    /// and [`ChatmateError::Io`] if it cannot be read.
    fn fetch(&self, name: &str) -> Result<Vec<u8>, ChatmateError>;
}
