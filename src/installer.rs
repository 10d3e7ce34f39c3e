//! Copy chatmates from the source into the destination directory.
use std::fmt;
use std::path::Path;

use crate::artifact::{Artifact, ArtifactOutcome, BatchReport, OperationOutcome};
use crate::error::{BatchAborted, ChatmateError};
use crate::logging::Log;
use crate::resources::chatmate::ChatmateFile;
use crate::security::{SecurityPolicy, validate_no_symlink};
use crate::source::SourceProvider;

/// Installs chatmates from a [`SourceProvider`] into a destination directory.
pub struct Installer<'a> {
    source: &'a dyn SourceProvider,
    policy: &'a SecurityPolicy,
    destination: &'a Path,
}

impl fmt::Debug for Installer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Installer")
            .field("source", &self.source.mode())
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

impl<'a> Installer<'a> {
    /// Create an installer writing into `destination`.
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

    /// Install a single chatmate.
    ///
    /// Security checks on the destination run first, and a symlink at the
    /// target is refused whether or not `force` is set.  An existing file is
    /// left alone (and the source never read) unless `force` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmateError::Security`] when a check fails (nothing is
    /// written), and source or I/O errors unchanged.
    pub fn install_one(
        &self,
        artifact: &Artifact,
        force: bool,
    ) -> Result<OperationOutcome, ChatmateError> {
        let filename = artifact.source_filename();
        let target = self.policy.validate_target(self.destination, filename)?;
        validate_no_symlink(self.destination, &target)?;
        let file = ChatmateFile::new(target);

        let existed = file.exists();
        if existed && !force {
            return Ok(OperationOutcome::Skipped);
        }

        let content = self.source.fetch(artifact.name())?;
        self.policy.validate_payload(filename, &content)?;
        file.write(&content)?;

        Ok(if existed {
            OperationOutcome::Reinstalled
        } else {
            OperationOutcome::Installed
        })
    }

    /// Install every chatmate in the catalog, in catalog order.
    ///
    /// Not transactional: the first error stops the batch, and chatmates
    /// written before it stay installed.
    ///
    /// # Errors
    ///
    /// Returns [`BatchAborted`] carrying the outcomes recorded so far.
    pub fn install_all(&self, force: bool, log: &dyn Log) -> Result<BatchReport, BatchAborted> {
        let catalog = self.source.catalog().map_err(BatchAborted::before_start)?;
        log.debug(&format!(
            "{} chatmate(s) from {} source",
            catalog.len(),
            self.source.mode()
        ));
        self.install_batch(catalog.iter(), force, log)
    }

    /// Install the chatmates with the given display names.
    ///
    /// Every name is looked up (exact, case-sensitive) before anything is
    /// written; if any is missing nothing is installed.  Repeated names are
    /// installed once.
    ///
    /// # Errors
    ///
    /// Returns [`BatchAborted`] with [`ChatmateError::NotFound`] listing every
    /// unknown name, or the first install error as for [`install_all`](Self::install_all).
    pub fn install_specific(
        &self,
        names: &[String],
        force: bool,
        log: &dyn Log,
    ) -> Result<BatchReport, BatchAborted> {
        let catalog = self.source.catalog().map_err(BatchAborted::before_start)?;

        let mut selected: Vec<&Artifact> = Vec::new();
        let mut missing: Vec<String> = Vec::new();
        for name in names {
            match catalog.get(name) {
                Some(artifact) if !selected.contains(&artifact) => selected.push(artifact),
                Some(_) => {}
                None if !missing.contains(name) => missing.push(name.clone()),
                None => {}
            }
        }
        if !missing.is_empty() {
            return Err(BatchAborted::before_start(ChatmateError::NotFound(missing)));
        }

        self.install_batch(selected, force, log)
    }

    fn install_batch<'c>(
        &self,
        artifacts: impl IntoIterator<Item = &'c Artifact>,
        force: bool,
        log: &dyn Log,
    ) -> Result<BatchReport, BatchAborted> {
        let mut report = BatchReport::default();
        for artifact in artifacts {
            match self.install_one(artifact, force) {
                Ok(outcome) => {
                    let entry = ArtifactOutcome::new(artifact.name(), outcome);
                    log.record_outcome(&entry);
                    report.push(entry);
                }
                Err(err) => {
                    if err.is_validation() {
                        let entry = ArtifactOutcome::with_detail(
                            artifact.name(),
                            OperationOutcome::ValidationFailed,
                            err.to_string(),
                        );
                        log.record_outcome(&entry);
                        report.push(entry);
                    }
                    return Err(BatchAborted {
                        report,
                        failed: Some(artifact.name().to_string()),
                        source: err,
                    });
                }
            }
        }
        Ok(report)
    }
}
