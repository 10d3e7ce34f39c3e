use anyhow::Result;

use crate::artifact::{ArtifactOutcome, OperationOutcome};
use crate::cli::{GlobalOpts, ValidateOpts};
use crate::config::Config;
use crate::header::validate_artifact;
use crate::logging::Logger;
use crate::security::SecurityPolicy;

/// Run the validate command.
///
/// Only the content ceiling is taken from configuration, so files can be
/// checked without a destination being configured.
///
/// # Errors
///
/// Returns an error if any file fails validation.
pub fn run(global: &GlobalOpts, opts: &ValidateOpts, log: &Logger) -> Result<()> {
    let policy = match Config::from_process(&global.overrides()) {
        Ok(config) => config.policy(),
        Err(e) => {
            log.debug(&format!("using default limits: {e}"));
            SecurityPolicy::default()
        }
    };
    execute(&policy, opts, log)
}

/// Validate every path in `opts`, reporting each one.
///
/// # Errors
///
/// Returns an error naming how many files failed.
pub fn execute(policy: &SecurityPolicy, opts: &ValidateOpts, log: &Logger) -> Result<()> {
    log.stage("Validating chatmates");
    for path in &opts.paths {
        let label = path.display().to_string();
        match validate_artifact(path, policy) {
            Ok(artifact) => {
                log.debug(&format!(
                    "{}: {} by {}, {} bytes, {} body characters",
                    artifact.name,
                    artifact.header.description,
                    artifact.header.author,
                    artifact.size,
                    artifact.body_chars
                ));
                log.info(&format!("✓ {label}"));
            }
            Err(e) => log.record_outcome(&ArtifactOutcome::with_detail(
                label,
                OperationOutcome::ValidationFailed,
                e.to_string(),
            )),
        }
    }

    let failed = log.failure_count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} file(s) failed validation", opts.paths.len());
    }
    Ok(())
}
