//! The [`Log`] trait shared by library code and the console logger.
use crate::artifact::ArtifactOutcome;

/// Abstraction over logging backends.
///
/// Operations stream per-chatmate outcomes through this trait as they
/// happen, so callers observe partial progress even when a batch aborts.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Report the outcome of one chatmate and keep it for the summary.
    fn record_outcome(&self, entry: &ArtifactOutcome);
}
