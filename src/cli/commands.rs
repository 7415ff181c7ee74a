//! Command dispatch
//!
//! Turns parsed arguments and settings into export options, runs the
//! requested command against the local account service, and writes listings
//! and run summaries to stdout. Lookup failures (unknown account or
//! statement) are returned before any export starts.

use super::args::{AccountsCommand, CliArgs, Command, ExportArgs, StatementsCommand};
use crate::config::{OutputPaths, Settings};
use crate::core::{parse_utc_offset, ExportController, ExportOptions, ExportReport};
use crate::io::{write_accounts_csv, write_statements_csv, LocalAccountService};
use crate::types::ExportError;
use chrono::Local;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Build export options from flags, falling back to settings
///
/// # Errors
///
/// `ExportError::InvalidOption` if the `--tz` value is not a UTC offset.
pub fn build_options(
    args: &CliArgs,
    export: Option<&ExportArgs>,
    settings: &Settings,
) -> Result<ExportOptions, ExportError> {
    let format = export
        .and_then(|e| e.format.clone())
        .unwrap_or_else(|| settings.export_format.clone());
    let timeout = args.timeout.or(settings.request_timeout_secs);

    let mut options = ExportOptions::default()
        .with_format(format)
        .with_max_concurrent(args.max_concurrent.unwrap_or(settings.max_concurrent_exports))
        .with_request_timeout(timeout.map(Duration::from_secs));

    if let Some(tz) = export.and_then(|e| e.time_zone.as_deref()) {
        options = options.with_time_zone(parse_utc_offset(tz)?);
    }

    Ok(options)
}

/// Run the parsed command
///
/// Cancelling `cancel` aborts pending account service requests; statements
/// already written stay on disk.
pub async fn run(
    args: CliArgs,
    settings: Settings,
    cancel: CancellationToken,
) -> Result<(), ExportError> {
    let service_dir = args
        .service_dir
        .clone()
        .or_else(|| settings.service_directory())
        .ok_or_else(|| {
            ExportError::config(
                "no account service directory; pass --service-dir or set service_directory",
            )
        })?;
    let controller = ExportController::new(Arc::new(LocalAccountService::new(service_dir)));

    let export_args = match &args.command {
        Command::ExportAll(export) => Some(export),
        Command::Statements(StatementsCommand::Export { export, .. }) => Some(export),
        _ => None,
    };
    let options = build_options(&args, export_args, &settings)?.with_cancellation(cancel);

    let mut stdout = std::io::stdout();

    match &args.command {
        Command::Accounts(AccountsCommand::List) => {
            let accounts = controller.accounts(&options).await?;
            write_accounts_csv(&accounts, &mut stdout)?;
        }

        Command::Statements(StatementsCommand::List { account }) => {
            let statements = match account {
                Some(id) => {
                    let account = controller.find_account(id, &options).await?;
                    controller.statements(&account.id, &options).await?
                }
                None => {
                    let mut statements = Vec::new();
                    for account in controller.exportable_accounts(&options).await? {
                        statements.extend(controller.statements(&account.id, &options).await?);
                    }
                    statements
                }
            };
            write_statements_csv(&statements, &mut stdout)?;
        }

        Command::Statements(StatementsCommand::Export {
            account,
            after,
            export,
        }) => {
            let account = controller.find_account(account, &options).await?;
            let options = match after {
                Some(statement) => {
                    let statement = controller
                        .find_statement(&account.id, statement, &options)
                        .await?;
                    options.after_statement(&statement)
                }
                None => options,
            };

            let paths = OutputPaths::resolve(&settings, export.output.as_deref());
            let output = paths.account_export_dir(&account.id, &Local::now())?;
            let report = controller.export_account(account, options, &output).await?;
            write_summary(&[report], &mut stdout)?;
        }

        Command::ExportAll(export) => {
            let paths = OutputPaths::resolve(&settings, export.output.as_deref());
            let output_root = paths.auto_export_dir(&Local::now());
            let reports = controller.auto_export_all(&output_root, &options).await?;
            write_summary(&reports, &mut stdout)?;
        }
    }

    Ok(())
}

/// One line per exported account: counts and output directory
fn write_summary(reports: &[ExportReport], output: &mut dyn Write) -> Result<(), ExportError> {
    for report in reports {
        writeln!(
            output,
            "{}: {} written, {} empty, {} failed -> {}",
            report.account,
            report.written(),
            report.empty(),
            report.failed(),
            report.output_dir.display()
        )?;
    }
    output.flush()?;
    Ok(())
}
