//! Deletion progress reporting using indicatif.
//!
//! The finder reports its own progress through the output it streams, so the
//! only bar dupeshell draws is for batch deletion.

use std::path::Path;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::actions::{DeleteProgressCallback, DeletionSummary};

/// Progress bar for a batch of deletions.
pub struct DeleteProgress {
    bar: ProgressBar,
}

impl DeleteProgress {
    /// Create a bar for `total` deletions. With `quiet`, nothing is drawn.
    ///
    /// ```
    /// use dupeshell::progress::DeleteProgress;
    ///
    /// let progress = DeleteProgress::new(3, true);
    /// assert_eq!(progress.position(), 0);
    /// ```
    #[must_use]
    pub fn new(total: usize, quiet: bool) -> Self {
        let bar = ProgressBar::new(total as u64);
        if quiet {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.red/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█>-"),
        );
        Self { bar }
    }

    /// Number of paths processed so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl DeleteProgressCallback for DeleteProgress {
    fn on_before_delete(&self, path: &Path, _index: usize, _total: usize) {
        self.bar
            .set_message(truncate_path(&path.to_string_lossy(), 40));
    }

    fn on_delete_success(&self, _path: &Path) {
        self.bar.inc(1);
    }

    fn on_delete_failure(&self, _path: &Path, _error: &str) {
        self.bar.inc(1);
    }

    fn on_complete(&self, summary: &DeletionSummary) {
        self.bar.finish_with_message(summary.summary());
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let keep = max_len.saturating_sub(3);
        let tail: String = file_name.chars().skip(name_len.saturating_sub(keep)).collect();
        return format!("...{}", tail);
    }

    format!(".../{}", file_name)
}
