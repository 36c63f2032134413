//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Write interchange files for translators
//! - `build`: Produce localized output from translations
//! - `init`: Create a default lit-localize.json

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(args)) | Some(Command::Build(args)) => args.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by `extract` and `build`.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Path to the config file (default: nearest lit-localize.json)
    #[arg(long, env = "LITLOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract messages from source files into interchange files
    Extract(CommonArgs),
    /// Build localized output from source files and translations
    Build(CommonArgs),
    /// Initialize a new lit-localize.json configuration file
    Init,
}
