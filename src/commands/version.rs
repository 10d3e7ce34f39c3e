//! Command: print version information.
use std::io::Write;

use anyhow::Result;

use super::emit;

/// Print the chatmate version to `out`.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn run(out: &mut dyn Write) -> Result<()> {
    emit(out, &format!("chatmate {}", crate::version()))
}
