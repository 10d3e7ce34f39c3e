//! Remove chatmates from the destination directory.
use std::path::{Path, PathBuf};

use crate::artifact::{ArtifactOutcome, BatchReport, OperationOutcome, display_name};
use crate::error::{BatchAborted, ChatmateError};
use crate::installed::InstalledSet;
use crate::logging::Log;
use crate::resources::ResourceChange;
use crate::resources::chatmate::ChatmateFile;
use crate::security::SecurityPolicy;

/// Deletes chatmate files from a destination directory.
///
/// Works only on what is present in the destination: the source is never
/// consulted, so chatmates the user created by hand can be removed too.
#[derive(Debug)]
pub struct Uninstaller<'a> {
    policy: &'a SecurityPolicy,
    destination: &'a Path,
}

impl<'a> Uninstaller<'a> {
    /// Create an uninstaller for `destination`.
    #[must_use]
    pub const fn new(policy: &'a SecurityPolicy, destination: &'a Path) -> Self {
        Self {
            policy,
            destination,
        }
    }

    /// Remove the chatmate with display name `name`.
    ///
    /// An absent file yields [`OperationOutcome::NotFound`], which counts as
    /// success.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmateError::Security`] if the name fails the checks
    /// (nothing is deleted) and [`ChatmateError::Io`] if deletion fails.
    pub fn uninstall_one(&self, name: &str) -> Result<OperationOutcome, ChatmateError> {
        let filename = self.policy.file_name_for(name);
        let target = self.policy.validate_target(self.destination, &filename)?;
        remove(target)
    }

    /// Remove a chatmate found in the destination listing.
    fn uninstall_listed(&self, name: &str) -> Result<OperationOutcome, ChatmateError> {
        let filename = self.policy.file_name_for(name);
        let target = self.policy.validate_listed(self.destination, &filename)?;
        remove(target)
    }

    /// Remove every chatmate present in the destination, including ones that
    /// did not come from the source.
    ///
    /// Listed names are not held to the character allow-list, so hand-written
    /// chatmates with any name are removed.
    ///
    /// # Errors
    ///
    /// Returns [`BatchAborted`] on the first failure; files removed before it
    /// stay removed.
    pub fn uninstall_all(&self, log: &dyn Log) -> Result<BatchReport, BatchAborted> {
        let installed = InstalledSet::read(self.destination, self.policy.suffix())
            .map_err(BatchAborted::before_start)?;
        if installed.is_empty() {
            log.debug(&format!(
                "no chatmates in {}",
                self.destination.display()
            ));
        }
        let names: Vec<String> = installed
            .filenames()
            .filter_map(|f| display_name(f, self.policy.suffix()))
            .map(str::to_string)
            .collect();
        self.uninstall_batch(&names, log, Self::uninstall_listed)
    }

    /// Remove the chatmates with the given display names.
    ///
    /// Names that are not installed are reported as
    /// [`OperationOutcome::NotFound`]; repeated names are processed once.
    ///
    /// # Errors
    ///
    /// Returns [`BatchAborted`] on the first failure.
    pub fn uninstall_specific(
        &self,
        names: &[String],
        log: &dyn Log,
    ) -> Result<BatchReport, BatchAborted> {
        let mut unique: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            if !unique.contains(name) {
                unique.push(name.clone());
            }
        }
        self.uninstall_batch(&unique, log, Self::uninstall_one)
    }

    fn uninstall_batch(
        &self,
        names: &[String],
        log: &dyn Log,
        uninstall: impl Fn(&Self, &str) -> Result<OperationOutcome, ChatmateError>,
    ) -> Result<BatchReport, BatchAborted> {
        let mut report = BatchReport::default();
        for name in names {
            match uninstall(self, name) {
                Ok(outcome) => {
                    let entry = ArtifactOutcome::new(name.as_str(), outcome);
                    log.record_outcome(&entry);
                    report.push(entry);
                }
                Err(err) => {
                    if err.is_validation() {
                        let entry = ArtifactOutcome::with_detail(
                            name.as_str(),
                            OperationOutcome::ValidationFailed,
                            err.to_string(),
                        );
                        log.record_outcome(&entry);
                        report.push(entry);
                    }
                    return Err(BatchAborted {
                        report,
                        failed: Some(name.clone()),
                        source: err,
                    });
                }
            }
        }
        Ok(report)
    }
}

fn remove(target: PathBuf) -> Result<OperationOutcome, ChatmateError> {
    match ChatmateFile::new(target).remove()? {
        ResourceChange::Applied => Ok(OperationOutcome::Removed),
        ResourceChange::AlreadyCorrect => Ok(OperationOutcome::NotFound),
    }
}
