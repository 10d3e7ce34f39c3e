//! Compare the catalog with the destination and report the difference.
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::artifact::Catalog;
use crate::error::ChatmateError;
use crate::installed::InstalledSet;
use crate::resources::chatmate::ChatmateFile;
use crate::security::SecurityPolicy;
use crate::source::{SourceMode, SourceProvider};

/// Catalog and installed names split into three disjoint sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    /// Available from the source but not installed.
    pub catalog_only: BTreeSet<String>,
    /// Installed but unknown to the source (user-authored or stale).
    pub installed_only: BTreeSet<String>,
    /// Available and installed.
    pub both: BTreeSet<String>,
}

/// Split `catalog` and `installed` display names into a [`Partition`].
///
/// The three sets are disjoint and their union equals the union of the
/// inputs.
pub fn partition<'a>(
    catalog: impl IntoIterator<Item = &'a str>,
    installed: impl IntoIterator<Item = &'a str>,
) -> Partition {
    let catalog: BTreeSet<String> = catalog.into_iter().map(str::to_string).collect();
    let installed: BTreeSet<String> = installed.into_iter().map(str::to_string).collect();
    Partition {
        catalog_only: catalog.difference(&installed).cloned().collect(),
        installed_only: installed.difference(&catalog).cloned().collect(),
        both: catalog.intersection(&installed).cloned().collect(),
    }
}

/// Where an installed chatmate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Also offered by the source.
    Catalog,
    /// Present only in the destination.
    Custom,
}

/// One line of the available view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableEntry {
    /// Display name.
    pub name: String,
    /// Whether it is currently installed.
    pub installed: bool,
}

/// One line of the installed view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledEntry {
    /// Display name.
    pub name: String,
    /// Catalog or custom.
    pub origin: Origin,
}

/// Output of [`Reporter::list_chatmates`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// Available view, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<Vec<AvailableEntry>>,
    /// Installed view, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed: Option<Vec<InstalledEntry>>,
}

impl Listing {
    /// Human-readable rendering without a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(available) = &self.available {
            let _ = writeln!(out, "Available chatmates ({}):", available.len());
            if available.is_empty() {
                out.push_str("  (none)\n");
            }
            for entry in available {
                if entry.installed {
                    let _ = writeln!(out, "  ✓ {} (installed)", entry.name);
                } else {
                    let _ = writeln!(out, "  ○ {}", entry.name);
                }
            }
        }
        if let Some(installed) = &self.installed {
            let _ = writeln!(out, "Installed chatmates ({}):", installed.len());
            if installed.is_empty() {
                out.push_str("  (none)\n");
            }
            for entry in installed {
                match entry.origin {
                    Origin::Catalog => {
                        let _ = writeln!(out, "  ✓ {}", entry.name);
                    }
                    Origin::Custom => {
                        let _ = writeln!(out, "  + {} (custom)", entry.name);
                    }
                }
            }
        }
        out.truncate(out.trim_end().len());
        out
    }
}

/// Output of [`Reporter::show_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Active source backend.
    pub source_mode: SourceMode,
    /// Directory path or `built-in`.
    pub source_location: String,
    /// Destination directory.
    pub destination: PathBuf,
    /// Whether the destination directory exists.
    pub destination_exists: bool,
    /// Whether the destination is a directory that is not read-only.
    pub destination_writable: bool,
    /// Chatmates offered by the source.
    pub available: usize,
    /// Chatmates present in the destination.
    pub installed: usize,
    /// Available but not installed.
    pub catalog_only: usize,
    /// Installed but not offered by the source.
    pub installed_only: usize,
    /// Available and installed.
    pub both: usize,
    /// Installed catalog chatmates whose bytes differ from the source.
    pub outdated: usize,
}

impl StatusReport {
    /// Human-readable rendering without a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let destination_state = match (self.destination_exists, self.destination_writable) {
            (false, _) => "missing",
            (true, true) => "writable",
            (true, false) => "read-only",
        };
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Source:        {} ({})",
            self.source_mode, self.source_location
        );
        let _ = writeln!(
            out,
            "Destination:   {} ({destination_state})",
            self.destination.display()
        );
        let _ = writeln!(out, "Available:     {}", self.available);
        let _ = writeln!(
            out,
            "Installed:     {} ({} from catalog, {} custom)",
            self.installed, self.both, self.installed_only
        );
        let _ = writeln!(out, "Not installed: {}", self.catalog_only);
        let _ = write!(out, "Outdated:      {}", self.outdated);
        out
    }
}

/// Read-only view over a source and a destination.
pub struct Reporter<'a> {
    source: &'a dyn SourceProvider,
    policy: &'a SecurityPolicy,
    destination: &'a Path,
}

impl std::fmt::Debug for Reporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("source", &self.source.mode())
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

impl<'a> Reporter<'a> {
    /// Create a reporter.
    #[must_use]
    pub fn new(
        source: &'a dyn SourceProvider,
        policy: &'a SecurityPolicy,
        destination: &'a Path,
    ) -> Self {
        Self {
            source,
            policy,
            destination,
        }
    }

    fn snapshot(&self) -> Result<(Catalog, InstalledSet), ChatmateError> {
        let catalog = self.source.catalog()?;
        let installed = InstalledSet::read(self.destination, self.policy.suffix())?;
        Ok((catalog, installed))
    }

    /// Partition the current catalog against the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the source or destination cannot be read.
    pub fn partition(&self) -> Result<Partition, ChatmateError> {
        let (catalog, installed) = self.snapshot()?;
        Ok(partition(catalog.names(), installed.names()))
    }

    /// Build the available and/or installed views.
    ///
    /// Passing `false` for both shows both.
    ///
    /// # Errors
    ///
    /// Returns an error if the source or destination cannot be read.
    pub fn list_chatmates(
        &self,
        show_available: bool,
        show_installed: bool,
    ) -> Result<Listing, ChatmateError> {
        let (show_available, show_installed) = if show_available || show_installed {
            (show_available, show_installed)
        } else {
            (true, true)
        };
        let parts = self.partition()?;

        let available = show_available.then(|| {
            let mut entries: Vec<AvailableEntry> = parts
                .catalog_only
                .iter()
                .map(|name| AvailableEntry {
                    name: name.clone(),
                    installed: false,
                })
                .chain(parts.both.iter().map(|name| AvailableEntry {
                    name: name.clone(),
                    installed: true,
                }))
                .collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            entries
        });

        let installed = show_installed.then(|| {
            let mut entries: Vec<InstalledEntry> = parts
                .both
                .iter()
                .map(|name| InstalledEntry {
                    name: name.clone(),
                    origin: Origin::Catalog,
                })
                .chain(parts.installed_only.iter().map(|name| InstalledEntry {
                    name: name.clone(),
                    origin: Origin::Custom,
                }))
                .collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            entries
        });

        Ok(Listing {
            available,
            installed,
        })
    }

    /// Summarise the source, the destination and how they differ.
    ///
    /// # Errors
    ///
    /// Returns an error if the source or destination cannot be read.
    pub fn show_status(&self) -> Result<StatusReport, ChatmateError> {
        let (catalog, installed) = self.snapshot()?;
        let parts = partition(catalog.names(), installed.names());

        let mut outdated = 0;
        for artifact in catalog.iter().filter(|a| parts.both.contains(a.name())) {
            let target = self
                .policy
                .validate_target(self.destination, artifact.source_filename())?;
            let expected = self.source.fetch(artifact.name())?;
            let file = ChatmateFile::new(target);
            if file.current_state(&expected)?.needs_change() {
                outdated += 1;
            }
        }

        let metadata = std::fs::metadata(self.destination).ok();
        Ok(StatusReport {
            source_mode: self.source.mode(),
            source_location: self.source.location(),
            destination: self.destination.to_path_buf(),
            destination_exists: metadata.is_some(),
            destination_writable: metadata
                .is_some_and(|m| m.is_dir() && !m.permissions().readonly()),
            available: catalog.len(),
            installed: installed.len(),
            catalog_only: parts.catalog_only.len(),
            installed_only: parts.installed_only.len(),
            both: parts.both.len(),
            outdated,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::source::EmbeddedSource;
    use proptest::prelude::*;

    fn source() -> EmbeddedSource {
        EmbeddedSource::from_table([
            ("A.chatmode.md", b"alpha".as_slice()),
            ("B.chatmode.md", b"bravo".as_slice()),
        ])
    }

    #[test]
    fn partition_splits_names() {
        let p = partition(["A", "B", "C"], ["B", "Mine"]);
        let set = |names: &[&str]| names.iter().map(|n| (*n).to_string()).collect::<BTreeSet<_>>();
        assert_eq!(p.catalog_only, set(&["A", "C"]));
        assert_eq!(p.installed_only, set(&["Mine"]));
        assert_eq!(p.both, set(&["B"]));
    }

    #[test]
    fn listing_defaults_to_both_views() {
        let dest = tempfile::tempdir().unwrap();
        std::fs::write(dest.path().join("A.chatmode.md"), "alpha").unwrap();
        std::fs::write(dest.path().join("Mine.chatmode.md"), "mine").unwrap();
        let source = source();
        let policy = SecurityPolicy::default();
        let reporter = Reporter::new(&source, &policy, dest.path());

        let listing = reporter.list_chatmates(false, false).unwrap();
        insta::assert_snapshot!(listing.render(), @r"
        Available chatmates (2):
          ✓ A (installed)
          ○ B
        Installed chatmates (2):
          ✓ A
          + Mine (custom)
        ");
    }

    #[test]
    fn listing_single_view_omits_the_other() {
        let dest = tempfile::tempdir().unwrap();
        let source = source();
        let policy = SecurityPolicy::default();
        let reporter = Reporter::new(&source, &policy, dest.path());

        let listing = reporter.list_chatmates(false, true).unwrap();
        assert!(listing.available.is_none());
        assert_eq!(listing.installed.as_deref(), Some(&[][..]));
        assert_eq!(listing.render(), "Installed chatmates (0):\n  (none)");
        assert_eq!(serde_json::to_string(&listing).unwrap(), r#"{"installed":[]}"#);
    }

    #[test]
    fn status_counts_outdated_copies() {
        let dest = tempfile::tempdir().unwrap();
        std::fs::write(dest.path().join("A.chatmode.md"), "alpha").unwrap();
        std::fs::write(dest.path().join("B.chatmode.md"), "edited").unwrap();
        std::fs::write(dest.path().join("Mine.chatmode.md"), "mine").unwrap();
        let source = source();
        let policy = SecurityPolicy::default();
        let reporter = Reporter::new(&source, &policy, dest.path());

        let status = reporter.show_status().unwrap();
        assert_eq!(status.source_mode, SourceMode::Embedded);
        assert!(status.destination_exists);
        assert!(status.destination_writable);
        assert_eq!(status.available, 2);
        assert_eq!(status.installed, 3);
        assert_eq!(status.both, 2);
        assert_eq!(status.installed_only, 1);
        assert_eq!(status.catalog_only, 0);
        assert_eq!(status.outdated, 1);
    }

    #[test]
    fn status_of_missing_destination() {
        let dest = tempfile::tempdir().unwrap();
        let missing = dest.path().join("prompts");
        let source = source();
        let policy = SecurityPolicy::default();
        let reporter = Reporter::new(&source, &policy, &missing);

        let status = reporter.show_status().unwrap();
        assert!(!status.destination_exists);
        assert!(!status.destination_writable);
        assert_eq!(status.catalog_only, 2);
        assert!(status.render().contains("(missing)"));
        assert!(status.render().ends_with("Outdated:      0"));
    }

    proptest! {
        #[test]
        fn partition_is_complete_and_disjoint(
            catalog in prop::collection::btree_set("[a-e]{1,2}", 0..8),
            installed in prop::collection::btree_set("[a-e]{1,2}", 0..8),
        ) {
            let p = partition(
                catalog.iter().map(String::as_str),
                installed.iter().map(String::as_str),
            );
            prop_assert!(p.catalog_only.is_disjoint(&p.installed_only));
            prop_assert!(p.catalog_only.is_disjoint(&p.both));
            prop_assert!(p.installed_only.is_disjoint(&p.both));

            let union: BTreeSet<String> = catalog.union(&installed).cloned().collect();
            let parts: BTreeSet<String> = p
                .catalog_only
                .iter()
                .chain(&p.installed_only)
                .chain(&p.both)
                .cloned()
                .collect();
            prop_assert_eq!(union, parts);
        }
    }
}
