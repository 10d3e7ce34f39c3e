use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Overrides;

/// Top-level CLI entry point for the chatmate manager.
#[derive(Parser, Debug)]
#[command(
    name = "chatmate",
    about = "Install, remove and inspect VS Code Copilot chat modes",
    version = crate::version()
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Destination prompts directory (overrides CHATMATE_DEST and the config file)
    #[arg(long, global = true, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Read chatmates from this directory instead of the built-in set
    #[arg(long, global = true, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Config file to load (default: $XDG_CONFIG_HOME/chatmate/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,
}

impl GlobalOpts {
    /// Configuration overrides carried by these flags.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            destination: self.dest.clone(),
            source: self.source.clone(),
            config_file: self.config.clone(),
            assume_yes: self.yes,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install chatmates into the destination
    Install(InstallOpts),
    /// Remove chatmates from the destination
    Uninstall(UninstallOpts),
    /// List available and installed chatmates
    List(ListOpts),
    /// Summarise source and destination state
    Status(StatusOpts),
    /// Check chatmate files against the header schema
    Validate(ValidateOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Uninstall(_) => "uninstall",
            Self::List(_) => "list",
            Self::Status(_) => "status",
            Self::Validate(_) => "validate",
            Self::Version => "version",
        }
    }
}

/// Which chatmates a batch command targets.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct Selection {
    /// Display names of the chatmates
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Every chatmate
    #[arg(short, long)]
    pub all: bool,
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InstallOpts {
    #[command(flatten)]
    pub selection: Selection,

    /// Overwrite chatmates that are already installed
    #[arg(short, long)]
    pub force: bool,
}

/// Options for the `uninstall` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct UninstallOpts {
    #[command(flatten)]
    pub selection: Selection,
}

/// Options for the `list` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ListOpts {
    /// Show chatmates offered by the source
    #[arg(long)]
    pub available: bool,

    /// Show chatmates present in the destination
    #[arg(long)]
    pub installed: bool,

    /// Emit JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for the `status` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct StatusOpts {
    /// Emit JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for the `validate` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ValidateOpts {
    /// Chatmate files to check
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install_names() {
        let cli = Cli::parse_from(["chatmate", "install", "Code Reviewer", "Solve Issue"]);
        let Command::Install(opts) = cli.command else {
            panic!("expected install");
        };
        assert_eq!(opts.selection.names, ["Code Reviewer", "Solve Issue"]);
        assert!(!opts.selection.all);
        assert!(!opts.force);
    }

    #[test]
    fn parse_install_all_force() {
        let cli = Cli::parse_from(["chatmate", "install", "--all", "--force"]);
        let Command::Install(opts) = cli.command else {
            panic!("expected install");
        };
        assert!(opts.selection.all);
        assert!(opts.force);
    }

    #[test]
    fn install_requires_a_selection() {
        assert!(Cli::try_parse_from(["chatmate", "install"]).is_err());
    }

    #[test]
    fn names_and_all_conflict() {
        assert!(Cli::try_parse_from(["chatmate", "uninstall", "--all", "A"]).is_err());
    }

    #[test]
    fn parse_uninstall_all() {
        let cli = Cli::parse_from(["chatmate", "uninstall", "-a"]);
        assert!(matches!(cli.command, Command::Uninstall(ref o) if o.selection.all));
    }

    #[test]
    fn parse_list_flags() {
        let cli = Cli::parse_from(["chatmate", "list", "--installed", "--json"]);
        let Command::List(opts) = cli.command else {
            panic!("expected list");
        };
        assert!(!opts.available);
        assert!(opts.installed);
        assert!(opts.json);
    }

    #[test]
    fn parse_status_json() {
        let cli = Cli::parse_from(["chatmate", "status", "--json"]);
        assert!(matches!(cli.command, Command::Status(StatusOpts { json: true })));
    }

    #[test]
    fn validate_requires_paths() {
        assert!(Cli::try_parse_from(["chatmate", "validate"]).is_err());
        let cli = Cli::parse_from(["chatmate", "validate", "a.chatmode.md"]);
        assert!(matches!(cli.command, Command::Validate(ref o) if o.paths.len() == 1));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "chatmate", "status", "--dest", "/tmp/prompts", "--source", "./mine", "-y", "-v",
        ]);
        assert!(cli.verbose);
        let overrides = cli.global.overrides();
        assert_eq!(overrides.destination, Some(PathBuf::from("/tmp/prompts")));
        assert_eq!(overrides.source, Some(PathBuf::from("./mine")));
        assert!(overrides.assume_yes);
    }

    #[test]
    fn version_flag_matches_version_command() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some(crate::version()));
        let rendered = cmd.render_version();
        assert_eq!(rendered.trim_end(), format!("chatmate {}", crate::version()));
    }

    #[test]
    fn command_names() {
        let cli = Cli::parse_from(["chatmate", "version"]);
        assert_eq!(cli.command.name(), "version");
        let cli = Cli::parse_from(["chatmate", "list"]);
        assert_eq!(cli.command.name(), "list");
    }
}
