//! Batch file deletion with per-path failure isolation.
//!
//! # Overview
//!
//! [`Deleter::delete_all`] removes each requested path independently:
//!
//! 1. The path is resolved to an absolute form
//! 2. Existence is checked without following symlinks; missing paths are
//!    recorded as `"does not exist"` and no removal is attempted
//! 3. The file is removed permanently
//!
//! Any error is captured into that path's [`DeletionResult`]. Processing never
//! stops early and successful deletions are never rolled back. There is no
//! trash and no undo.
//!
//! # Example
//!
//! ```no_run
//! use dupeshell::actions::delete::Deleter;
//!
//! # async fn demo() {
//! let results = Deleter::new()
//!     .delete_all(&["/tmp/dup1.txt", "/tmp/dup2.txt"])
//!     .await;
//!
//! for result in &results {
//!     match result.error {
//!         None => println!("Deleted: {}", result.path.display()),
//!         Some(ref e) => eprintln!("Failed: {}: {}", result.path.display(), e),
//!     }
//! }
//! # }
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Error type for a single deletion.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// Nothing exists at the path.
    #[error("does not exist")]
    NotFound(PathBuf),

    /// The path could not be made absolute.
    #[error("cannot resolve path: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Checking or removing the file failed.
    #[error("{source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::Resolve { path: p, .. } | Self::Io { path: p, .. } => p,
        }
    }
}

/// Outcome of deleting one requested path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionResult {
    /// The path exactly as it was requested.
    pub path: PathBuf,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeletionResult {
    #[must_use]
    pub fn deleted(path: PathBuf) -> Self {
        Self {
            path,
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(path: PathBuf, error: impl Into<String>) -> Self {
        Self {
            path,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Counts derived from a batch of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeletionSummary {
    pub deleted: usize,
    pub failed: usize,
}

impl DeletionSummary {
    /// Tally a batch of results.
    #[must_use]
    pub fn from_results(results: &[DeletionResult]) -> Self {
        let deleted = results.iter().filter(|r| r.success).count();
        Self {
            deleted,
            failed: results.len() - deleted,
        }
    }

    /// Total number of attempted deletions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.deleted + self.failed
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!("Deleted {} file(s)", self.deleted)
        } else {
            format!("Deleted {} file(s), {} failed", self.deleted, self.failed)
        }
    }
}

/// Callback trait for deletion progress reporting.
pub trait DeleteProgressCallback: Send + Sync {
    /// Called before each file deletion.
    fn on_before_delete(&self, path: &Path, index: usize, total: usize);

    /// Called after successful deletion.
    fn on_delete_success(&self, path: &Path);

    /// Called after failed deletion.
    fn on_delete_failure(&self, path: &Path, error: &str);

    /// Called when the batch completes.
    fn on_complete(&self, summary: &DeletionSummary);
}

/// Permanently delete one file.
///
/// `requested` is made absolute relative to the current directory first.
/// Symlinks are not followed: a link (dangling or not) is itself removed and
/// its target is left untouched.
///
/// # Errors
///
/// - `Resolve` if the path cannot be made absolute (e.g. it is empty)
/// - `NotFound` if nothing exists at the path
/// - `Io` if checking or removing fails (permission denied, directory, races)
pub async fn delete_file(requested: &Path) -> Result<PathBuf, DeleteError> {
    let absolute = std::path::absolute(requested).map_err(|source| DeleteError::Resolve {
        path: requested.to_path_buf(),
        source,
    })?;
    log::debug!("Attempting to delete: {}", absolute.display());

    match tokio::fs::symlink_metadata(&absolute).await {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(DeleteError::NotFound(absolute));
        }
        Err(source) => {
            return Err(DeleteError::Io {
                path: absolute,
                source,
            });
        }
    }

    tokio::fs::remove_file(&absolute)
        .await
        .map_err(|source| DeleteError::Io {
            path: absolute.clone(),
            source,
        })?;

    log::info!("Permanently deleted: {}", absolute.display());
    Ok(absolute)
}

/// Deletes batches of files sequentially, isolating failures per path.
#[derive(Default)]
pub struct Deleter<'a> {
    callback: Option<&'a dyn DeleteProgressCallback>,
}

impl<'a> Deleter<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self { callback: None }
    }

    /// Report progress to `callback`.
    #[must_use]
    pub fn with_callback(mut self, callback: &'a dyn DeleteProgressCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Delete every path, returning one result per input in input order.
    pub async fn delete_all<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<DeletionResult> {
        let total = paths.len();
        log::debug!("Received delete request for {} file(s)", total);
        let mut results = Vec::with_capacity(total);

        for (index, requested) in paths.iter().enumerate() {
            let requested = requested.as_ref();
            if let Some(cb) = self.callback {
                cb.on_before_delete(requested, index, total);
            }

            let result = match delete_file(requested).await {
                Ok(_) => {
                    if let Some(cb) = self.callback {
                        cb.on_delete_success(requested);
                    }
                    DeletionResult::deleted(requested.to_path_buf())
                }
                Err(e) => {
                    let message = e.to_string();
                    log::warn!("Failed to delete {}: {}", requested.display(), message);
                    if let Some(cb) = self.callback {
                        cb.on_delete_failure(requested, &message);
                    }
                    DeletionResult::failed(requested.to_path_buf(), message)
                }
            };
            results.push(result);
        }

        let summary = DeletionSummary::from_results(&results);
        if let Some(cb) = self.callback {
            cb.on_complete(&summary);
        }
        log::info!("{}", summary.summary());

        results
    }
}
