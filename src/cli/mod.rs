// CLI module
// Command-line interface, argument parsing and command dispatch

mod args;
mod commands;

pub use args::{AccountsCommand, CliArgs, Command, ExportArgs, StatementsCommand};
pub use commands::{build_options, run};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing subcommand, or --help),
/// clap displays an error message or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
