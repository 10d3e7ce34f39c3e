//! Core data model: chatmates, the catalog, and per-chatmate outcomes.
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::ChatmateError;

/// Filename suffix that marks a chatmate (VS Code chat mode) file.
pub const CHATMATE_SUFFIX: &str = ".chatmode.md";

/// Strip `suffix` from `filename`, returning the display name.
///
/// Returns `None` when the filename does not end with the suffix or when
/// nothing would be left of it.
///
/// # Examples
///
/// ```
/// use chatmate::artifact::{display_name, CHATMATE_SUFFIX};
///
/// assert_eq!(display_name("Code Reviewer.chatmode.md", CHATMATE_SUFFIX), Some("Code Reviewer"));
/// assert_eq!(display_name("notes.md", CHATMATE_SUFFIX), None);
/// assert_eq!(display_name(".chatmode.md", CHATMATE_SUFFIX), None);
/// ```
#[must_use]
pub fn display_name<'a>(filename: &'a str, suffix: &str) -> Option<&'a str> {
    filename
        .strip_suffix(suffix)
        .filter(|name| !name.is_empty())
}

/// A named chatmate resolvable from a source.
///
/// The content is not held here; it is fetched on demand through the
/// [`SourceProvider`](crate::source::SourceProvider) so that skipped installs
/// never read it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Artifact {
    name: String,
    source_filename: String,
}

impl Artifact {
    /// Build an artifact from its source filename.
    ///
    /// Returns `None` for filenames that are not chatmates (see [`display_name`]).
    #[must_use]
    pub fn from_filename(filename: &str, suffix: &str) -> Option<Self> {
        display_name(filename, suffix).map(|name| Self {
            name: name.to_string(),
            source_filename: filename.to_string(),
        })
    }

    /// Build an artifact from its display name.
    #[must_use]
    pub fn from_name(name: &str, suffix: &str) -> Self {
        Self {
            name: name.to_string(),
            source_filename: format!("{name}{suffix}"),
        }
    }

    /// Display name, e.g. `Code Reviewer`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Filename at the source, identical to the installed filename.
    #[must_use]
    pub fn source_filename(&self) -> &str {
        &self.source_filename
    }
}

/// The ordered set of chatmates available from the active source.
///
/// Always sorted by display name so listings and batch operations are
/// reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    artifacts: Vec<Artifact>,
}

impl Catalog {
    /// Build a catalog, sorting by display name.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmateError::NameCollision`] when two artifacts share a
    /// display name ignoring ASCII case; they would overwrite each other on a
    /// case-insensitive destination filesystem.
    pub fn new(artifacts: impl IntoIterator<Item = Artifact>) -> Result<Self, ChatmateError> {
        let mut artifacts: Vec<Artifact> = artifacts.into_iter().collect();
        artifacts.sort();
        check_collisions(&artifacts)?;
        Ok(Self { artifacts })
    }

    /// Look up an artifact by exact (case-sensitive) display name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }

    /// Iterate over artifacts in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.artifacts.iter()
    }

    /// Iterate over display names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.iter().map(Artifact::name)
    }

    /// Number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Return `true` when the source offers nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

fn check_collisions(artifacts: &[Artifact]) -> Result<(), ChatmateError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for artifact in artifacts {
        let key = artifact.name.to_ascii_lowercase();
        if let Some(first) = seen.insert(key.clone(), &artifact.source_filename) {
            return Err(ChatmateError::NameCollision {
                name: key,
                first: first.to_string(),
                second: artifact.source_filename.clone(),
            });
        }
    }
    Ok(())
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Artifact;
    type IntoIter = std::slice::Iter<'a, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Result of an operation on a single chatmate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationOutcome {
    /// Written to a destination where it was absent.
    Installed,
    /// Overwritten because `force` was set.
    Reinstalled,
    /// Already present and `force` was not set; nothing read or written.
    Skipped,
    /// Deleted from the destination.
    Removed,
    /// Already absent from the destination; uninstall treats this as success.
    NotFound,
    /// Rejected by a security or header check before any mutation.
    ValidationFailed,
}

impl OperationOutcome {
    /// Every outcome, in summary order.
    pub const ALL: [Self; 6] = [
        Self::Installed,
        Self::Reinstalled,
        Self::Skipped,
        Self::Removed,
        Self::NotFound,
        Self::ValidationFailed,
    ];

    /// Short human label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::Reinstalled => "reinstalled",
            Self::Skipped => "skipped",
            Self::Removed => "removed",
            Self::NotFound => "not installed",
            Self::ValidationFailed => "validation failed",
        }
    }

    /// Return `true` for every outcome except [`ValidationFailed`](Self::ValidationFailed).
    #[must_use]
    pub const fn is_success(self) -> bool {
        !matches!(self, Self::ValidationFailed)
    }
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one chatmate within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactOutcome {
    /// Display name.
    pub name: String,
    /// What happened.
    pub outcome: OperationOutcome,
    /// Optional detail (e.g. the validation error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ArtifactOutcome {
    /// Create an entry without detail.
    #[must_use]
    pub fn new(name: impl Into<String>, outcome: OperationOutcome) -> Self {
        Self {
            name: name.into(),
            outcome,
            detail: None,
        }
    }

    /// Create an entry carrying a detail message.
    #[must_use]
    pub fn with_detail(
        name: impl Into<String>,
        outcome: OperationOutcome,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            outcome,
            detail: Some(detail.into()),
        }
    }
}

/// Ordered outcomes of a batch operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    entries: Vec<ArtifactOutcome>,
}

impl BatchReport {
    /// Append an entry.
    pub fn push(&mut self, entry: ArtifactOutcome) {
        self.entries.push(entry);
    }

    /// All entries in processing order.
    #[must_use]
    pub fn entries(&self) -> &[ArtifactOutcome] {
        &self.entries
    }

    /// Outcome recorded for `name`, if any.
    #[must_use]
    pub fn outcome_of(&self, name: &str) -> Option<OperationOutcome> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.outcome)
    }

    /// Number of entries with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: OperationOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when nothing was processed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn artifact(filename: &str) -> Artifact {
        Artifact::from_filename(filename, CHATMATE_SUFFIX).unwrap()
    }

    #[test]
    fn name_round_trips_through_filename() {
        let a = artifact("Solve Issue.chatmode.md");
        assert_eq!(a.name(), "Solve Issue");
        assert_eq!(Artifact::from_name(a.name(), CHATMATE_SUFFIX), a);
    }

    #[test]
    fn non_chatmate_filenames_are_not_artifacts() {
        assert!(Artifact::from_filename("README.md", CHATMATE_SUFFIX).is_none());
        assert!(Artifact::from_filename(".chatmode.md", CHATMATE_SUFFIX).is_none());
        assert!(Artifact::from_filename("x.chatmode.md.bak", CHATMATE_SUFFIX).is_none());
    }

    #[test]
    fn catalog_is_sorted_by_name() {
        let catalog = Catalog::new([
            artifact("Zeta.chatmode.md"),
            artifact("Alpha.chatmode.md"),
            artifact("Mid.chatmode.md"),
        ])
        .unwrap();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, ["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn catalog_rejects_case_insensitive_collisions() {
        let err = Catalog::new([artifact("Reviewer.chatmode.md"), artifact("reviewer.chatmode.md")])
            .unwrap_err();
        assert!(
            matches!(err, ChatmateError::NameCollision { ref name, .. } if name == "reviewer"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn catalog_lookup_is_case_sensitive() {
        let catalog = Catalog::new([artifact("Alpha.chatmode.md")]).unwrap();
        assert!(catalog.get("Alpha").is_some());
        assert!(catalog.get("alpha").is_none());
    }

    #[test]
    fn batch_report_counts_outcomes() {
        let mut report = BatchReport::default();
        report.push(ArtifactOutcome::new("A", OperationOutcome::Installed));
        report.push(ArtifactOutcome::new("B", OperationOutcome::Skipped));
        report.push(ArtifactOutcome::new("C", OperationOutcome::Installed));
        assert_eq!(report.count(OperationOutcome::Installed), 2);
        assert_eq!(report.count(OperationOutcome::Skipped), 1);
        assert_eq!(report.outcome_of("B"), Some(OperationOutcome::Skipped));
        assert_eq!(report.outcome_of("Z"), None);
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn outcome_serializes_as_snake_case() {
        let entry = ArtifactOutcome::new("A", OperationOutcome::ValidationFailed);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"name":"A","outcome":"validation_failed"}"#);
    }

    #[test]
    fn only_validation_failure_is_unsuccessful() {
        for outcome in OperationOutcome::ALL {
            assert_eq!(
                outcome.is_success(),
                outcome != OperationOutcome::ValidationFailed
            );
        }
    }
}
