//! Chatmates read live from a directory on disk.
use std::path::{Path, PathBuf};

use super::{SourceMode, SourceProvider};
use crate::artifact::{Artifact, CHATMATE_SUFFIX, Catalog};
use crate::error::ChatmateError;
use crate::security;

/// A flat directory of `*.chatmode.md` files.
///
/// Subdirectories and files without the chatmate suffix are ignored.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    suffix: String,
}

impl DirectorySource {
    /// Read chatmates from `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: CHATMATE_SUFFIX.to_string(),
        }
    }

    /// The directory being read.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceProvider for DirectorySource {
    fn mode(&self) -> SourceMode {
        SourceMode::External
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn catalog(&self) -> Result<Catalog, ChatmateError> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| ChatmateError::io(&self.root, e))?;
        let mut artifacts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ChatmateError::io(&self.root, e))?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(artifact) = entry
                .file_name()
                .to_str()
                .and_then(|name| Artifact::from_filename(name, &self.suffix))
            {
                artifacts.push(artifact);
            }
        }
        Catalog::new(artifacts)
    }

    fn fetch(&self, name: &str) -> Result<Vec<u8>, ChatmateError> {
        let filename = format!("{name}{}", self.suffix);
        let path = security::validate_destination_path(&self.root, &filename)?;
        std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ChatmateError::NotFound(vec![name.to_string()])
            } else {
                ChatmateError::io(path, e)
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_chatmate_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Beta.chatmode.md"), "b").unwrap();
        std::fs::write(dir.path().join("Alpha.chatmode.md"), "a").unwrap();
        std::fs::write(dir.path().join("notes.md"), "n").unwrap();
        std::fs::create_dir(dir.path().join("Nested.chatmode.md")).unwrap();

        let source = DirectorySource::new(dir.path());
        let names: Vec<String> = source
            .catalog()
            .unwrap()
            .names()
            .map(String::from)
            .collect();
        assert_eq!(names, ["Alpha", "Beta"]);
        assert_eq!(source.mode(), SourceMode::External);
    }

    #[test]
    fn catalog_of_missing_directory_is_io_error() {
        let source = DirectorySource::new("/nonexistent/chatmates");
        assert!(matches!(source.catalog(), Err(ChatmateError::Io { .. })));
    }

    #[test]
    fn fetch_reads_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Alpha.chatmode.md"), "alpha").unwrap();
        let source = DirectorySource::new(dir.path());
        assert_eq!(source.fetch("Alpha").unwrap(), b"alpha");
    }

    #[test]
    fn fetch_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path());
        assert!(matches!(
            source.fetch("Ghost"),
            Err(ChatmateError::NotFound(_))
        ));
    }

    #[test]
    fn fetch_cannot_leave_the_source_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("src"));
        assert!(matches!(
            source.fetch("../secret"),
            Err(ChatmateError::Security(_))
        ));
    }
}
