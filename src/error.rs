//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for dupeshell.
///
/// - 0: Success (finder succeeded, every requested deletion succeeded)
/// - 1: General error (bad arguments, config, unexpected failure)
/// - 2: Finder failed (spawn error, non-zero exit, timeout)
/// - 3: Partial deletion (at least one path could not be deleted)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: everything completed.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Finder failed: the external finder did not succeed.
    FinderFailed = 2,
    /// Partial deletion: some files could not be deleted.
    PartialDeletion = 3,
    /// Interrupted: the run was cancelled by the user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::FinderFailed => "DS002",
            Self::PartialDeletion => "DS003",
            Self::Interrupted => "DS130",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its context chain
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
