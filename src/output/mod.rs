//! Output formatters for finder runs and deletions.
//!
//! Text output is written directly by the terminal presenter; this module
//! holds the machine-readable JSON documents printed with `--output json`.
//!
//! # Example
//!
//! ```
//! use dupeshell::finder::ProcessOutcome;
//! use dupeshell::output::json::RunReport;
//! use std::path::PathBuf;
//! use std::time::Duration;
//!
//! let outcome = ProcessOutcome::Success { raw_output: "done\n".into() };
//! let report = RunReport::new(&[PathBuf::from("/photos")], &outcome, chrono::Utc::now(), Duration::from_millis(12));
//! println!("{}", report.to_json_pretty().unwrap());
//! ```

pub mod json;

// Re-export main types
pub use json::{DeletionReport, RunReport, RunStatus};
