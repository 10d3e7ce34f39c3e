//! Yes/no confirmation before destructive batch operations.
use anyhow::{Context as _, Result};

/// Asks the user to approve an operation.
#[cfg_attr(test, mockall::automock)]
pub trait Confirmer {
    /// Return `true` if the user approves `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be shown (e.g. no TTY available).
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Prompts on the terminal with [`dialoguer`], defaulting to "no".
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .context("reading confirmation")
    }
}

/// Approves everything without prompting (`--yes`, `CHATMATE_YES`, `CI`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Pick the confirmer for the given interactivity setting.
#[must_use]
pub fn for_mode(non_interactive: bool) -> Box<dyn Confirmer> {
    if non_interactive {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalConfirmer)
    }
}
