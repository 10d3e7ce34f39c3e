//! Chatmates physically present in the destination directory.
use std::collections::BTreeSet;
use std::path::Path;

use crate::artifact::display_name;
use crate::error::ChatmateError;

/// Snapshot of chatmate filenames in the destination at the time it was read.
///
/// Always re-read for each operation; never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledSet {
    filenames: BTreeSet<String>,
    suffix: String,
}

impl InstalledSet {
    /// Enumerate regular files ending in `suffix` directly inside `dir`.
    ///
    /// A missing destination directory yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmateError::Io`] if the directory exists but cannot be read.
    pub fn read(dir: &Path, suffix: &str) -> Result<Self, ChatmateError> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self {
                    filenames: BTreeSet::new(),
                    suffix: suffix.to_string(),
                });
            }
            Err(e) => return Err(ChatmateError::io(dir, e)),
        };

        let mut filenames = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|e| ChatmateError::io(dir, e))?;
            if entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && display_name(name, suffix).is_some()
            {
                filenames.insert(name.to_string());
            }
        }

        Ok(Self {
            filenames,
            suffix: suffix.to_string(),
        })
    }

    /// Installed filenames, sorted.
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.filenames.iter().map(String::as_str)
    }

    /// Installed display names, sorted by filename.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filenames
            .iter()
            .filter_map(|f| display_name(f, &self.suffix))
    }

    /// Return `true` if a chatmate with display name `name` is installed.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.filenames.contains(&format!("{name}{}", self.suffix))
    }

    /// Number of installed chatmates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    /// Return `true` if nothing is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}
