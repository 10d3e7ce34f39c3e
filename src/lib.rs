//! Chat mode ("chatmate") management engine.
//!
//! Installs, removes and inspects VS Code Copilot chat-mode files
//! (`<Name>.chatmode.md`) in a single flat destination directory owned by
//! the editor.  Chatmates come either from a table compiled into the binary
//! or from a live `chatmates/` directory.
//!
//! The public API is organised into four layers:
//!
//! - **[`security`]** / **[`header`]** - pure validation of names, paths,
//!   sizes and the metadata header
//! - **[`source`]** / **[`installed`]** - what is available and what is present
//! - **[`installer`]**, **[`uninstaller`]**, **[`status`]** - the operations
//! - **[`commands`]** - top-level subcommand orchestration for the `chatmate` binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod artifact;
pub mod cli;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod error;
pub mod header;
pub mod installed;
pub mod installer;
pub mod logging;
pub mod resources;
pub mod security;
pub mod source;
pub mod status;
pub mod uninstaller;

/// Version string reported by `chatmate version` and the log file header.
///
/// Set from `git describe` by the build script; falls back to the package
/// version for builds outside a git checkout.
#[must_use]
pub fn version() -> &'static str {
    option_env!("CHATMATE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}
