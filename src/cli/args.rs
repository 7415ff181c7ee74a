use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Export credit account statements for personal-finance software
#[derive(Parser, Debug)]
#[command(name = "statement-export")]
#[command(about = "Export credit account statements as QFX files", long_about = None)]
pub struct CliArgs {
    /// Directory the local account service reads accounts.csv, statements.csv and transactions.csv from
    #[arg(long = "service-dir", value_name = "DIR", global = true)]
    pub service_dir: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Give up on an account service request after this many seconds
    #[arg(long = "timeout", value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Maximum number of statements fetched at the same time
    #[arg(long = "max-concurrent", value_name = "COUNT", global = true)]
    pub max_concurrent: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Account commands
    #[command(subcommand)]
    Accounts(AccountsCommand),

    /// Statement commands
    #[command(subcommand)]
    Statements(StatementsCommand),

    /// Export every exportable account
    ExportAll(ExportArgs),
}

#[derive(Subcommand, Debug)]
pub enum AccountsCommand {
    /// List all accounts as CSV
    List,
}

#[derive(Subcommand, Debug)]
pub enum StatementsCommand {
    /// List statements as CSV (every exportable account when none is given)
    List {
        /// Account identifier
        #[arg(value_name = "ACCOUNT")]
        account: Option<String>,
    },

    /// Export the statements of one account
    Export {
        /// Account identifier
        #[arg(value_name = "ACCOUNT")]
        account: String,

        /// Only export statements opening on or after this statement's opening date
        #[arg(long = "after", value_name = "STATEMENT")]
        after: Option<String>,

        #[command(flatten)]
        export: ExportArgs,
    },
}

/// Options shared by the export commands
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Export format requested from the account service
    #[arg(long = "format", value_name = "FORMAT")]
    pub format: Option<String>,

    /// Base output directory
    #[arg(long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// UTC offset statement boundaries are interpreted in, e.g. +02:00 (default: local)
    #[arg(long = "tz", value_name = "OFFSET", allow_hyphen_values = true)]
    pub time_zone: Option<String>,
}
