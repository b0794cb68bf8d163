//! JSON output for finder runs and deletions.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "status": "failure",
//!   "directories": ["/photos", "/backup"],
//!   "exit_code": 2,
//!   "reason": "Process exited with code 2",
//!   "output": "",
//!   "output_bytes": 0,
//!   "started_at": "2024-05-01T12:00:00Z",
//!   "duration_ms": 1534,
//!   "deletions": {
//!     "confirmed": true,
//!     "results": [
//!       { "path": "/photos/a (1).jpg", "success": true },
//!       { "path": "/photos/b (1).jpg", "success": false, "error": "does not exist" }
//!     ],
//!     "summary": { "deleted": 1, "failed": 1 }
//!   }
//! }
//! ```
//!
//! `output` is the finder's accumulated stdout for successful runs and empty
//! otherwise. `exit_code` is the finder's own exit code and is omitted unless
//! the finder exited with a non-zero code. `deletions` appears only when a deletion ran.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::actions::{DeletionResult, DeletionSummary};
use crate::finder::ProcessOutcome;

/// Error type for JSON output operations.
#[derive(Debug, thiserror::Error)]
pub enum JsonOutputError {
    /// Serialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Writing to the output stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Overall result of a finder run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failure,
}

/// Per-path deletion results plus counts.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionReport {
    /// False when deletion was declined and nothing was attempted.
    pub confirmed: bool,
    pub results: Vec<DeletionResult>,
    pub summary: DeletionSummary,
}

impl DeletionReport {
    #[must_use]
    pub fn new(results: Vec<DeletionResult>) -> Self {
        let summary = DeletionSummary::from_results(&results);
        Self {
            confirmed: true,
            results,
            summary,
        }
    }

    /// Report for a deletion the user did not confirm.
    #[must_use]
    pub fn declined() -> Self {
        Self {
            confirmed: false,
            results: Vec::new(),
            summary: DeletionSummary::default(),
        }
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Report for one finder run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub directories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Everything the finder printed on stdout, in arrival order.
    pub output: String,
    /// Length of `output` in bytes.
    pub output_bytes: usize,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletions: Option<DeletionReport>,
}

impl RunReport {
    #[must_use]
    pub fn new(
        directories: &[PathBuf],
        outcome: &ProcessOutcome,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        let (status, exit_code, reason, output) = match outcome {
            ProcessOutcome::Success { raw_output } => {
                (RunStatus::Success, None, None, raw_output.clone())
            }
            ProcessOutcome::Failure { reason } => (
                RunStatus::Failure,
                reason.exit_code(),
                Some(reason.to_string()),
                String::new(),
            ),
        };

        Self {
            status,
            directories: directories.iter().map(|d| path_string(d)).collect(),
            exit_code,
            reason,
            output_bytes: output.len(),
            output,
            started_at,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            deletions: None,
        }
    }

    /// Attach the outcome of the deletion step.
    #[must_use]
    pub fn with_deletions(mut self, deletions: DeletionReport) -> Self {
        self.deletions = Some(deletions);
        self
    }

    /// Serialize as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writeln!(writer, "{}", json)?;
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
