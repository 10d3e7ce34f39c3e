use std::io::Write;

use anyhow::Result;

use super::{CommandSetup, emit};
use crate::cli::{GlobalOpts, StatusOpts};
use crate::logging::Logger;
use crate::status::Reporter;

/// Run the status command, writing to stdout.
///
/// # Errors
///
/// Returns an error if configuration fails or the source or destination
/// cannot be read.
pub fn run(global: &GlobalOpts, opts: &StatusOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    execute(&setup, opts, &mut std::io::stdout().lock())
}

/// Render the status report into `out`.
///
/// # Errors
///
/// See [`run`].
pub fn execute(setup: &CommandSetup, opts: &StatusOpts, out: &mut dyn Write) -> Result<()> {
    let reporter = Reporter::new(
        setup.source.as_ref(),
        &setup.policy,
        &setup.config.destination,
    );
    let report = reporter.show_status()?;
    let text = if opts.json {
        serde_json::to_string_pretty(&report)?
    } else {
        report.render()
    };
    emit(out, &text)
}
