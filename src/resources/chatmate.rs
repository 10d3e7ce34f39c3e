//! A single chatmate file in the destination directory.
use std::path::{Path, PathBuf};

use super::helpers::fs::{ensure_dir, remove_existing};
use super::{ResourceChange, ResourceState};
use crate::error::ChatmateError;

/// A chatmate file at an already-validated destination path.
///
/// Construct it only with a path returned by
/// [`SecurityPolicy::validate_target`](crate::security::SecurityPolicy::validate_target).
#[derive(Debug, Clone)]
pub struct ChatmateFile {
    path: PathBuf,
}

impl ChatmateFile {
    /// Create a resource for the chatmate file at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Destination path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return `true` if anything (including a dangling symlink) occupies the path.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.symlink_metadata().is_ok()
    }

    /// Compare the installed file with `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmateError::Io`] if an existing file cannot be read.
    pub fn current_state(&self, expected: &[u8]) -> Result<ResourceState, ChatmateError> {
        if !self.exists() {
            return Ok(ResourceState::Missing);
        }
        let installed = std::fs::read(&self.path).map_err(|e| ChatmateError::io(&self.path, e))?;
        if installed == expected {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: format!(
                    "installed copy has {} bytes, source has {}",
                    installed.len(),
                    expected.len()
                ),
            })
        }
    }

    /// Write `content`, replacing any existing file.
    ///
    /// The destination directory is created if missing.  The write is a plain
    /// truncate-and-write: an I/O failure part way through can leave a
    /// partially written file behind.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmateError::Io`] if the directory or file cannot be written.
    pub fn write(&self, content: &[u8]) -> Result<ResourceChange, ChatmateError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        std::fs::write(&self.path, content).map_err(|e| ChatmateError::io(&self.path, e))?;
        Ok(ResourceChange::Applied)
    }

    /// Delete the file.  Removing an absent file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmateError::Io`] if the file exists but cannot be deleted.
    pub fn remove(&self) -> Result<ResourceChange, ChatmateError> {
        if remove_existing(&self.path)? {
            Ok(ResourceChange::Applied)
        } else {
            Ok(ResourceChange::AlreadyCorrect)
        }
    }
}
