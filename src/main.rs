use anyhow::Result;
use clap::Parser;

use chatmate::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let name = args.command.name();
    logging::init_subscriber(args.verbose, name);
    let log = logging::Logger::new(name);

    match &args.command {
        cli::Command::Install(opts) => commands::install::run(&args.global, opts, &log),
        cli::Command::Uninstall(opts) => commands::uninstall::run(&args.global, opts, &log),
        cli::Command::List(opts) => commands::list::run(&args.global, opts, &log),
        cli::Command::Status(opts) => commands::status::run(&args.global, opts, &log),
        cli::Command::Validate(opts) => commands::validate::run(&args.global, opts, &log),
        cli::Command::Version => commands::version::run(&mut std::io::stdout().lock()),
    }
}
