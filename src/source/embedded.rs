//! Chatmates compiled into the binary.
use std::collections::BTreeMap;

use include_dir::{Dir, include_dir};

use super::{SourceMode, SourceProvider};
use crate::artifact::{Artifact, CHATMATE_SUFFIX, Catalog};
use crate::error::ChatmateError;

/// Everything under `chatmates/`, embedded at build time.
static BUNDLED: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/chatmates");

/// Read-only in-memory table of chatmate files keyed by filename.
#[derive(Debug, Clone)]
pub struct EmbeddedSource {
    files: BTreeMap<String, &'static [u8]>,
    suffix: String,
}

impl EmbeddedSource {
    /// The chatmates shipped with this binary.
    #[must_use]
    pub fn bundled() -> Self {
        Self::from_table(BUNDLED.files().filter_map(|file| {
            let name = file.path().file_name()?.to_str()?;
            Some((name, file.contents()))
        }))
    }

    /// Build a source from explicit `(filename, content)` pairs.
    ///
    /// Later entries with the same filename replace earlier ones.
    pub fn from_table<'a>(entries: impl IntoIterator<Item = (&'a str, &'static [u8])>) -> Self {
        Self {
            files: entries
                .into_iter()
                .map(|(name, content)| (name.to_string(), content))
                .collect(),
            suffix: CHATMATE_SUFFIX.to_string(),
        }
    }
}

impl SourceProvider for EmbeddedSource {
    fn mode(&self) -> SourceMode {
        SourceMode::Embedded
    }

    fn location(&self) -> String {
        "built-in".to_string()
    }

    fn catalog(&self) -> Result<Catalog, ChatmateError> {
        Catalog::new(
            self.files
                .keys()
                .filter_map(|filename| Artifact::from_filename(filename, &self.suffix)),
        )
    }

    fn fetch(&self, name: &str) -> Result<Vec<u8>, ChatmateError> {
        self.files
            .get(&format!("{name}{}", self.suffix))
            .map(|content| content.to_vec())
            .ok_or_else(|| ChatmateError::NotFound(vec![name.to_string()]))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::header::parse_header;

    #[test]
    fn bundled_catalog_is_non_empty_and_sorted() {
        let source = EmbeddedSource::bundled();
        let catalog = source.catalog().unwrap();
        assert!(!catalog.is_empty());
        let names: Vec<&str> = catalog.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn bundled_chatmates_have_valid_headers() {
        let source = EmbeddedSource::bundled();
        for artifact in &source.catalog().unwrap() {
            let content = source.fetch(artifact.name()).unwrap();
            let result = parse_header(&content);
            assert!(result.is_ok(), "{}: {result:?}", artifact.name());
        }
    }

    #[test]
    fn non_chatmate_entries_are_ignored() {
        let source = EmbeddedSource::from_table([
            ("A.chatmode.md", b"a".as_slice()),
            ("README.md", b"readme".as_slice()),
        ]);
        let names: Vec<String> = source
            .catalog()
            .unwrap()
            .names()
            .map(String::from)
            .collect();
        assert_eq!(names, ["A"]);
    }

    #[test]
    fn fetch_returns_exact_bytes() {
        let source = EmbeddedSource::from_table([("A.chatmode.md", b"alpha".as_slice())]);
        assert_eq!(source.fetch("A").unwrap(), b"alpha");
        assert_eq!(source.mode(), SourceMode::Embedded);
    }

    #[test]
    fn fetch_unknown_is_not_found() {
        let source = EmbeddedSource::from_table(std::iter::empty());
        assert!(matches!(
            source.fetch("Ghost"),
            Err(ChatmateError::NotFound(names)) if names == ["Ghost"]
        ));
    }
}
