//! Structured logger with per-chatmate outcome collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{OUTCOME_TARGET, STAGE_TARGET};
use super::types::Log;
use super::utils::log_file_path;
use crate::artifact::{ArtifactOutcome, OperationOutcome};

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger that streams chatmate outcomes and prints a summary.
///
/// Messages go through [`tracing`]; the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) sends them to the
/// console and to `$XDG_CACHE_HOME/chatmate/<command>.log`.
#[derive(Debug)]
pub struct Logger {
    outcomes: Mutex<Vec<ArtifactOutcome>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`.
    ///
    /// Stores the log file path for display in the summary; the file itself
    /// is created by the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            outcomes: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Create a logger that never mentions a log file.
    ///
    /// Useful when embedding the engine or in tests.
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            outcomes: Mutex::new(Vec::new()),
            log_file: None,
        }
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Report a chatmate outcome immediately and keep it for the summary.
    ///
    /// The event carries `chatmate`, `outcome` and `detail` fields; failures
    /// are emitted at `error` level.
    pub fn record_outcome(&self, entry: &ArtifactOutcome) {
        let detail = entry.detail.as_deref();
        if entry.outcome.is_success() {
            tracing::info!(
                target: OUTCOME_TARGET,
                chatmate = %entry.name,
                outcome = entry.outcome.label(),
                detail,
            );
        } else {
            tracing::error!(
                target: OUTCOME_TARGET,
                chatmate = %entry.name,
                outcome = entry.outcome.label(),
                detail,
            );
        }

        if let Ok(mut guard) = self.outcomes.lock() {
            guard.push(entry.clone());
        }
    }

    /// All outcomes recorded so far, in order.
    #[must_use]
    pub fn outcomes(&self) -> Vec<ArtifactOutcome> {
        self.outcomes.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Count the recorded outcomes that are failures.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.outcomes.lock().map_or(0, |guard| {
            guard.iter().filter(|e| !e.outcome.is_success()).count()
        })
    }

    /// Print per-outcome totals of everything recorded.
    pub fn print_summary(&self) {
        let outcomes = self.outcomes();
        if outcomes.is_empty() {
            return;
        }

        self.stage("Summary");
        let parts: Vec<String> = OperationOutcome::ALL
            .iter()
            .filter_map(|&outcome| {
                let n = outcomes.iter().filter(|e| e.outcome == outcome).count();
                (n > 0).then(|| format!("{n} {outcome}"))
            })
            .collect();
        self.info(&format!(
            "{} chatmate(s): {}",
            outcomes.len(),
            parts.join(", ")
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("log: {}", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error);

    fn record_outcome(&self, entry: &ArtifactOutcome) {
        self.record_outcome(entry);
    }
}
