//! Statement Export CLI
//!
//! Command-line interface for exporting credit account statements.
//!
//! # Usage
//!
//! ```bash
//! statement-export --service-dir ./service accounts list
//! statement-export --service-dir ./service statements list A1
//! statement-export --service-dir ./service statements export A1 --format=qfx --after=S1
//! statement-export --service-dir ./service export-all --output ./exports
//! ```
//!
//! Listings are written to stdout as CSV; logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success (individual statements may still have failed; see the logs)
//! - 1: Error (unknown account or statement, unusable output directory, etc.)

use statement_export::cli;
use statement_export::config::Settings;
use std::process;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();

    let settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    initialize_logging(args.verbose, &settings);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: Failed to create tokio runtime: {}", e);
            process::exit(1);
        }
    };

    let result = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let interrupt = tokio::spawn(cancel_on_interrupt(cancel.clone()));
        let result = cli::run(args, settings, cancel).await;
        interrupt.abort();
        result
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Cancel pending exports on Ctrl-C; finished statements stay on disk
async fn cancel_on_interrupt(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("Interrupted, cancelling pending exports");
        cancel.cancel();
    }
}

/// Initialize logging
///
/// `RUST_LOG` takes precedence; otherwise the level comes from the
/// verbosity flags, falling back to the settings file.
fn initialize_logging(verbose: u8, settings: &Settings) {
    let level = match verbose {
        0 => settings.log_level.to_tracing_level(),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
