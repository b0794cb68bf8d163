//! Subcommand handlers.
//!
//! Each handler returns the process exit code; unexpected errors propagate as
//! `anyhow::Error` and are reported by `main`.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::actions::{DeletionResult, DeletionSummary};
use crate::bridge::terminal::{TerminalPicker, TerminalPresenter};
use crate::bridge::{delete_with_presenter, Presenter, Session};
use crate::cli::{DeleteArgs, OutputFormat, ScanArgs};
use crate::config::{Config, ScanOverrides};
use crate::error::ExitCode;
use crate::finder::request::suggest_hash_algorithm;
use crate::finder::{FailureReason, FinderRequest, Orchestrator, ProcessOutcome};
use crate::output::{DeletionReport, RunReport};
use crate::report::read_report;
use crate::signal::install_handler;

/// Run the finder, then optionally delete the candidates it reported.
///
/// # Errors
///
/// Returns an error for configuration, directory selection, or report
/// reading problems. Finder failures are reported through the exit code.
pub async fn scan(args: ScanArgs, mut config: Config, quiet: bool) -> Result<ExitCode> {
    config.apply_scan_overrides(ScanOverrides {
        interpreter: args.interpreter,
        script: args.script,
        timeout_secs: args.timeout,
        hash_algorithm: args.hash_algorithm,
        recursive: args.recursive,
    });

    let shutdown = install_handler()?;
    let command = config.finder_command()?;
    let orchestrator = Orchestrator::new(command)
        .with_timeout(config.timeout())
        .with_shutdown(shutdown.clone());

    let picker = TerminalPicker::stdin(args.directories);
    let presenter = TerminalPresenter::new(args.output, quiet, args.yes).with_shutdown(shutdown);
    let mut session = Session::new(orchestrator, picker, presenter);

    let directories = session.select_directories()?;
    let request = build_request(directories, &config, args.output_file.as_deref())?;
    if let Some(report_path) = request.output_file() {
        clear_stale_report(report_path).await?;
    }

    let started_at = Utc::now();
    let clock = Instant::now();
    let outcome = session.run_duplicate_finder(&request).await;
    let elapsed = clock.elapsed();

    let mut deletions = None;
    if args.delete && outcome.is_success() {
        if let Some(report_path) = request.output_file() {
            let candidates = report_candidates(report_path)?;
            deletions = Some(delete_confirmed(session.presenter_mut(), &candidates).await);
        }
    }

    if args.output == OutputFormat::Json {
        let mut report = RunReport::new(request.directories(), &outcome, started_at, elapsed);
        if let Some(ref deletions) = deletions {
            report = report.with_deletions(deletions.clone());
        }
        report
            .write_to(&mut io::stdout().lock(), true)
            .context("Failed to write JSON output")?;
    }

    Ok(exit_code_for(
        &outcome,
        deletions.as_ref().map(|d| d.results.as_slice()),
    ))
}

/// Permanently delete the given paths and any listed in a finder report.
///
/// # Errors
///
/// Returns an error if the report cannot be read or output cannot be written.
pub async fn delete(args: DeleteArgs, quiet: bool) -> Result<ExitCode> {
    let mut paths = args.paths;
    if let Some(ref report) = args.from_report {
        paths.extend(read_report(report)?);
    }

    let shutdown = install_handler()?;
    let mut presenter = TerminalPresenter::new(args.output, quiet, args.yes).with_shutdown(shutdown);
    let deletions = delete_confirmed(&mut presenter, &paths).await;

    if args.output == OutputFormat::Json {
        let json = deletions
            .to_json_pretty()
            .context("Failed to serialize deletion results")?;
        println!("{}", json);
    }

    Ok(deletion_exit_code(&deletions.results))
}

/// Print the interpreter and script a scan would use.
///
/// Returns `GeneralError` when the script does not exist at that location.
///
/// # Errors
///
/// Returns an error if a default script location cannot be determined.
pub fn locate(config: &Config) -> Result<ExitCode> {
    let locator = config.script_locator();
    let script = locator
        .locate()
        .context("Failed to determine finder script location")?;
    let mode = if locator.script.is_some() {
        "explicit".to_string()
    } else {
        locator.mode.effective().to_string()
    };

    println!("interpreter: {}", config.interpreter());
    println!("script:      {}", script.display());
    println!("mode:        {}", mode);

    if script.is_file() {
        Ok(ExitCode::Success)
    } else {
        log::warn!("Finder script not found at {}", script.display());
        Ok(ExitCode::GeneralError)
    }
}

/// Assemble the finder request from selected directories and settings.
///
/// # Errors
///
/// Returns an error if no directories were selected, a directory is empty,
/// or the hash algorithm is blank.
pub fn build_request(
    directories: Vec<PathBuf>,
    config: &Config,
    output_file: Option<&Path>,
) -> Result<FinderRequest> {
    let mut request = FinderRequest::new(directories)
        .context("Cannot run the duplicate finder")?
        .with_recursive(config.recursive);

    if let Some(ref name) = config.hash_algorithm {
        if let Some(suggestion) = suggest_hash_algorithm(name.trim()) {
            log::warn!(
                "Unknown hash algorithm '{}', did you mean '{}'? Passing it to the finder as given.",
                name.trim(),
                suggestion
            );
        }
        request = request
            .with_hash_algorithm(name.as_str())
            .context("Cannot run the duplicate finder")?;
    }

    if let Some(path) = output_file {
        let absolute = std::path::absolute(path)
            .with_context(|| format!("Invalid report path: {}", path.display()))?;
        request = request.with_output_file(absolute);
    }

    Ok(request)
}

/// Map a run (and any deletion that followed it) to an exit code.
#[must_use]
pub fn exit_code_for(outcome: &ProcessOutcome, deletions: Option<&[DeletionResult]>) -> ExitCode {
    match outcome {
        ProcessOutcome::Failure {
            reason: FailureReason::Cancelled,
        } => ExitCode::Interrupted,
        ProcessOutcome::Failure { .. } => ExitCode::FinderFailed,
        ProcessOutcome::Success { .. } => deletions.map_or(ExitCode::Success, deletion_exit_code),
    }
}

fn deletion_exit_code(results: &[DeletionResult]) -> ExitCode {
    if DeletionSummary::from_results(results).all_succeeded() {
        ExitCode::Success
    } else {
        ExitCode::PartialDeletion
    }
}

/// Remove a report left at `report_path` by an earlier run.
///
/// The finder writes its report only when it finds candidates, so an old file
/// would otherwise be read back as this run's candidates.
async fn clear_stale_report(report_path: &Path) -> Result<()> {
    match tokio::fs::remove_file(report_path).await {
        Ok(()) => {
            log::info!("Removed previous report at {}", report_path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| {
            format!("Failed to remove previous report: {}", report_path.display())
        }),
    }
}

/// Candidates from this run's report; no report means nothing to delete.
fn report_candidates(report_path: &Path) -> Result<Vec<PathBuf>> {
    if report_path.exists() {
        read_report(report_path)
    } else {
        log::info!(
            "No report written to {}; nothing to delete",
            report_path.display()
        );
        Ok(Vec::new())
    }
}

/// Ask the presenter to confirm, then delete.
async fn delete_confirmed<R: Presenter + ?Sized>(
    presenter: &mut R,
    candidates: &[PathBuf],
) -> DeletionReport {
    if candidates.is_empty() {
        log::info!("Nothing to delete");
        return DeletionReport::new(Vec::new());
    }
    if !presenter.confirm_deletion(candidates) {
        log::info!("Deletion cancelled");
        return DeletionReport::declined();
    }
    DeletionReport::new(delete_with_presenter(presenter, candidates).await)
}
