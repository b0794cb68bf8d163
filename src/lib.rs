//! dupeshell - shell for an external duplicate-file finder
//!
//! Launches a duplicate-finder script as a subprocess, streams its stdout and
//! stderr to the user as they arrive, and permanently deletes the files the
//! user selects, reporting a result for every path.

pub mod actions;
pub mod bridge;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod finder;
pub mod logging;
pub mod output;
pub mod progress;
pub mod report;
pub mod signal;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::ExitCode;

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error for invalid configuration, unreadable input, or runtime
/// setup failures. Finder and deletion failures are reported through the
/// returned exit code instead.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    let config = Config::load(cli.config.as_deref())?;
    log::debug!("Loaded configuration: {:?}", config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let quiet = cli.quiet;
    runtime.block_on(async move {
        match cli.command {
            Commands::Scan(args) => commands::scan(args, config, quiet).await,
            Commands::Delete(args) => commands::delete(args, quiet).await,
            Commands::Locate => commands::locate(&config),
        }
    })
}
