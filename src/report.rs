//! Reading the finder's deletion-candidate report.
//!
//! When invoked with `-o <file>`, the finder writes one candidate path per
//! line, wrapped in single quotes so the file can be fed to a shell. A single
//! quote inside a path is written as `'\''` (close quote, escaped quote, reopen).
//!
//! ```text
//! '/photos/IMG_0001 (1).jpg'
//! '/music/Don'\''t Stop.mp3'
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Parse report content into candidate paths.
///
/// Lines that are not quoted are taken as-is (trimmed); blank lines are skipped.
///
/// ```
/// use dupeshell::report::parse_report;
/// use std::path::PathBuf;
///
/// let paths = parse_report("'/a b.txt'\n'/it'\\''s.txt'\n");
/// assert_eq!(paths, vec![PathBuf::from("/a b.txt"), PathBuf::from("/it's.txt")]);
/// ```
#[must_use]
pub fn parse_report(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| PathBuf::from(unquote_line(line)))
        .collect()
}

/// Read and parse a report file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_report(path: &Path) -> Result<Vec<PathBuf>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read finder report: {}", path.display()))?;
    let paths = parse_report(&content);
    log::debug!(
        "Read {} candidate(s) from report {}",
        paths.len(),
        path.display()
    );
    Ok(paths)
}

/// Undo POSIX single-quote shell quoting for one line.
fn unquote_line(line: &str) -> String {
    if !line.starts_with('\'') {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' => quoted = !quoted,
            '\\' if !quoted => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            other => out.push(other),
        }
    }

    out
}
