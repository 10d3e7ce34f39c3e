use std::io::Write;

use anyhow::Result;

use super::{CommandSetup, emit};
use crate::cli::{GlobalOpts, ListOpts};
use crate::logging::Logger;
use crate::status::Reporter;

/// Run the list command, writing to stdout.
///
/// # Errors
///
/// Returns an error if configuration fails or the source or destination
/// cannot be read.
pub fn run(global: &GlobalOpts, opts: &ListOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    execute(&setup, opts, &mut std::io::stdout().lock())
}

/// Render the listing into `out`.
///
/// # Errors
///
/// See [`run`].
pub fn execute(setup: &CommandSetup, opts: &ListOpts, out: &mut dyn Write) -> Result<()> {
    let reporter = Reporter::new(
        setup.source.as_ref(),
        &setup.policy,
        &setup.config.destination,
    );
    let listing = reporter.list_chatmates(opts.available, opts.installed)?;
    let text = if opts.json {
        serde_json::to_string_pretty(&listing)?
    } else {
        listing.render()
    };
    emit(out, &text)
}
