use anyhow::Result;

use super::{CommandSetup, finish_batch};
use crate::artifact::BatchReport;
use crate::cli::{GlobalOpts, UninstallOpts};
use crate::confirm::{self, Confirmer};
use crate::installed::InstalledSet;
use crate::logging::Logger;
use crate::uninstaller::Uninstaller;

/// Run the uninstall command.
///
/// # Errors
///
/// Returns an error if configuration fails or the batch aborts.
pub fn run(global: &GlobalOpts, opts: &UninstallOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let confirmer = confirm::for_mode(setup.config.non_interactive);
    execute(&setup, opts, confirmer.as_ref(), log)?;
    Ok(())
}

/// Uninstall with an explicit confirmer.
///
/// Returns `None` when the user declines the confirmation prompt.
///
/// # Errors
///
/// See [`run`].
pub fn execute(
    setup: &CommandSetup,
    opts: &UninstallOpts,
    confirmer: &dyn Confirmer,
    log: &Logger,
) -> Result<Option<BatchReport>> {
    let destination = setup.config.destination.as_path();
    let uninstaller = Uninstaller::new(&setup.policy, destination);

    if opts.selection.all {
        let installed = InstalledSet::read(destination, setup.policy.suffix())?;
        if installed.is_empty() {
            log.info(&format!("no chatmates installed in {}", destination.display()));
            return Ok(Some(BatchReport::default()));
        }
        let prompt = format!(
            "Remove all {} chatmate(s) from {}?",
            installed.len(),
            destination.display()
        );
        if !confirmer.confirm(&prompt)? {
            log.info("uninstall cancelled");
            return Ok(None);
        }

        log.stage("Removing chatmates");
        let report = finish_batch(uninstaller.uninstall_all(log), log)?;
        return Ok(Some(report));
    }

    log.stage("Removing chatmates");
    let report = finish_batch(
        uninstaller.uninstall_specific(&opts.selection.names, log),
        log,
    )?;
    Ok(Some(report))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::artifact::OperationOutcome;
    use crate::cli::Selection;
    use crate::config::{Config, SourceSelection};
    use crate::confirm::MockConfirmer;
    use crate::security::DEFAULT_MAX_CONTENT_BYTES;

    fn setup(dest: &std::path::Path) -> CommandSetup {
        CommandSetup::from_config(Config {
            destination: dest.to_path_buf(),
            source: SourceSelection::Embedded,
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
            non_interactive: false,
        })
    }

    fn all() -> UninstallOpts {
        UninstallOpts {
            selection: Selection {
                names: vec![],
                all: true,
            },
        }
    }

    #[test]
    fn uninstall_all_asks_first() {
        let dest = tempfile::tempdir().unwrap();
        std::fs::write(dest.path().join("A.chatmode.md"), "a").unwrap();
        let mut confirmer = MockConfirmer::new();
        confirmer
            .expect_confirm()
            .withf(|prompt| prompt.contains("Remove all 1 chatmate(s)"))
            .times(1)
            .returning(|_| Ok(false));

        let result = execute(&setup(dest.path()), &all(), &confirmer, &Logger::detached());
        assert!(result.unwrap().is_none());
        assert!(dest.path().join("A.chatmode.md").exists());
    }

    #[test]
    fn empty_destination_needs_no_confirmation() {
        let dest = tempfile::tempdir().unwrap();
        let mut confirmer = MockConfirmer::new();
        confirmer.expect_confirm().never();

        let report = execute(&setup(dest.path()), &all(), &confirmer, &Logger::detached())
            .unwrap()
            .unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn named_uninstall_reports_absent_as_not_found() {
        let dest = tempfile::tempdir().unwrap();
        let opts = UninstallOpts {
            selection: Selection {
                names: vec!["Ghost".to_string()],
                all: false,
            },
        };
        let mut confirmer = MockConfirmer::new();
        confirmer.expect_confirm().never();

        let report = execute(&setup(dest.path()), &opts, &confirmer, &Logger::detached())
            .unwrap()
            .unwrap();
        assert_eq!(report.outcome_of("Ghost"), Some(OperationOutcome::NotFound));
    }
}
