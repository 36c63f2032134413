//! Dispatch a parsed command line to its command.

use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{build::build, extract::extract, init::init},
    exit_status::ExitStatus,
    report,
};

pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    let (result, verbose) = match command {
        Some(Command::Extract(args)) => (extract(&args)?, args.verbose),
        Some(Command::Build(args)) => (build(&args)?, args.verbose),
        Some(Command::Init) => return init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    };

    report::print(&result, verbose);
    Ok(ExitStatus::from_result(&result))
}
