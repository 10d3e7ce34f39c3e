//! Subcommand implementations and the setup they share.
pub mod install;
pub mod list;
pub mod status;
pub mod uninstall;
pub mod validate;
pub mod version;

use std::io::Write;

use anyhow::{Context as _, Result};

use crate::artifact::BatchReport;
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::BatchAborted;
use crate::logging::Logger;
use crate::security::SecurityPolicy;
use crate::source::SourceProvider;

/// Shared state produced by the common command setup sequence.
///
/// Resolves configuration once and builds the security policy and source
/// backend from it, so each command starts from the same snapshot.
pub struct CommandSetup {
    /// Resolved configuration.
    pub config: Config,
    /// Policy built from `config`.
    pub policy: SecurityPolicy,
    /// Source backend selected by `config`.
    pub source: Box<dyn SourceProvider>,
}

impl std::fmt::Debug for CommandSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSetup")
            .field("config", &self.config)
            .field("policy", &self.policy)
            .field("source", &self.source.mode())
            .finish()
    }
}

impl CommandSetup {
    /// Resolve configuration from flags, environment and the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or invalid.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let config =
            Config::from_process(&global.overrides()).context("resolving configuration")?;
        let setup = Self::from_config(config);
        log.debug(&format!(
            "source: {} ({})",
            setup.source.mode(),
            setup.source.location()
        ));
        log.debug(&format!(
            "destination: {}",
            setup.config.destination.display()
        ));
        Ok(setup)
    }

    /// Build the policy and source backend for an already resolved config.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let policy = config.policy();
        let source = config.source_provider();
        Self {
            config,
            policy,
            source,
        }
    }
}

/// Print the summary of a finished batch and turn an abort into an error.
///
/// # Errors
///
/// Returns the [`BatchAborted`] error, after reporting how many chatmates
/// were already processed.
pub fn finish_batch(
    result: Result<BatchReport, BatchAborted>,
    log: &Logger,
) -> Result<BatchReport> {
    log.print_summary();
    match result {
        Ok(report) => Ok(report),
        Err(aborted) => {
            if !aborted.report.is_empty() {
                log.warn(&format!(
                    "{} chatmate(s) processed before the failure were kept",
                    aborted.report.len()
                ));
            }
            Err(aborted.into())
        }
    }
}

/// Write `text` and a trailing newline to `out`.
///
/// # Errors
///
/// Returns an error if the writer fails (e.g. a closed pipe).
pub fn emit(out: &mut dyn Write, text: &str) -> Result<()> {
    writeln!(out, "{text}").context("writing output")
}
