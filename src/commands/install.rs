use anyhow::Result;

use super::{CommandSetup, finish_batch};
use crate::artifact::BatchReport;
use crate::cli::{GlobalOpts, InstallOpts};
use crate::confirm::{self, Confirmer};
use crate::installed::InstalledSet;
use crate::installer::Installer;
use crate::logging::Logger;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if configuration fails, a requested chatmate does not
/// exist, or the batch aborts.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let confirmer = confirm::for_mode(setup.config.non_interactive);
    execute(&setup, opts, confirmer.as_ref(), log)?;
    Ok(())
}

/// Install with an explicit confirmer.
///
/// Returns `None` when the user declines the confirmation prompt.
///
/// # Errors
///
/// See [`run`].
pub fn execute(
    setup: &CommandSetup,
    opts: &InstallOpts,
    confirmer: &dyn Confirmer,
    log: &Logger,
) -> Result<Option<BatchReport>> {
    let destination = setup.config.destination.as_path();
    let installer = Installer::new(setup.source.as_ref(), &setup.policy, destination);

    if opts.selection.all {
        let catalog = setup.source.catalog()?;
        let installed = InstalledSet::read(destination, setup.policy.suffix())?;
        let pending = catalog
            .names()
            .filter(|name| opts.force || !installed.contains_name(name))
            .count();

        if pending > 0 {
            let prompt = if opts.force {
                format!(
                    "Install {pending} chatmate(s) into {}, overwriting existing copies?",
                    destination.display()
                )
            } else {
                format!(
                    "Install {pending} chatmate(s) into {}?",
                    destination.display()
                )
            };
            if !confirmer.confirm(&prompt)? {
                log.info("install cancelled");
                return Ok(None);
            }
        }

        log.stage(&format!("Installing chatmates from {} source", setup.source.mode()));
        let report = finish_batch(installer.install_all(opts.force, log), log)?;
        return Ok(Some(report));
    }

    if opts.force {
        let prompt = format!(
            "Overwrite {} in {}?",
            opts.selection.names.join(", "),
            destination.display()
        );
        if !confirmer.confirm(&prompt)? {
            log.info("install cancelled");
            return Ok(None);
        }
    }

    log.stage("Installing chatmates");
    let report = finish_batch(
        installer.install_specific(&opts.selection.names, opts.force, log),
        log,
    )?;
    Ok(Some(report))
}
