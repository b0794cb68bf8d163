//! Command-line interface definitions for dupeshell.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options (verbosity, color, config file) apply to every subcommand.
//!
//! # Example
//!
//! ```bash
//! # Run the finder over two directories, recursively, streaming its output
//! dupeshell scan ~/Pictures ~/Backup -r
//!
//! # Ask the finder for a candidate report, then delete what it lists
//! dupeshell scan ~/Pictures -r -o dupes.txt --delete
//!
//! # Delete specific files and print per-file results as JSON
//! dupeshell delete a.jpg b.jpg --output json
//!
//! # Show which interpreter and script would be used
//! dupeshell locate
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell for an external duplicate-file finder.
///
/// dupeshell launches the finder script, streams its progress, and deletes
/// the duplicates you select. Deletion is permanent.
#[derive(Debug, Parser)]
#[command(name = "dupeshell")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as structured JSON
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (default: platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for dupeshell.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the duplicate finder over one or more directories
    Scan(ScanArgs),
    /// Permanently delete files
    Delete(DeleteArgs),
    /// Print the interpreter and finder script that would be used
    Locate,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directories to scan (read from stdin, one per line, when omitted)
    #[arg(value_name = "DIR")]
    pub directories: Vec<PathBuf>,

    /// Scan directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Hash algorithm for the finder to use (e.g. md5, sha1, sha256)
    #[arg(long, value_name = "NAME")]
    pub hash_algorithm: Option<String>,

    /// Ask the finder to write duplicate candidates to this file
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Finder script to run instead of the resolved default
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Interpreter command for the finder script
    #[arg(long, value_name = "CMD")]
    pub interpreter: Option<String>,

    /// Kill the finder after this many seconds (0 disables)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// After a successful scan, delete the candidates listed in the report
    #[arg(long, requires = "output_file")]
    pub delete: bool,

    /// Skip the deletion confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Result format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the delete subcommand.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Files to delete
    #[arg(value_name = "PATH", required_unless_present = "from_report")]
    pub paths: Vec<PathBuf>,

    /// Also delete every path listed in a finder report
    #[arg(long, value_name = "FILE")]
    pub from_report: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Result format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format for run and deletion results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
