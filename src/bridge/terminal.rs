//! Terminal implementations of the bridge traits.
//!
//! - [`TerminalPicker`]: directories from the command line, or one per line
//!   from stdin when none were given
//! - [`TerminalPresenter`]: streams finder output to stdout/stderr, asks for
//!   deletion confirmation, and draws a deletion progress bar
//!
//! In JSON mode every streamed chunk goes to stderr so stdout carries only the
//! final JSON document.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use yansi::Paint;

use super::{DirectoryPicker, Presenter};
use crate::actions::{DeleteProgressCallback, DeletionResult, DeletionSummary};
use crate::cli::OutputFormat;
use crate::finder::{FinderRequest, ProcessOutcome, StreamEvent};
use crate::progress::DeleteProgress;
use crate::signal::ShutdownHandler;

/// Where [`TerminalPicker`] reads directories from when none were preset.
enum Input {
    /// Locked only while reading, so later prompts can use stdin too.
    Stdin { interactive: bool },
    Reader(Box<dyn BufRead>),
}

/// Picks directories from preset arguments or from line-oriented input.
pub struct TerminalPicker {
    preset: Vec<PathBuf>,
    input: Input,
}

impl TerminalPicker {
    /// Use `preset` if non-empty, otherwise prompt on stdin.
    #[must_use]
    pub fn stdin(preset: Vec<PathBuf>) -> Self {
        Self {
            preset,
            input: Input::Stdin {
                interactive: io::stdin().is_terminal(),
            },
        }
    }

    /// Read from arbitrary input (used by tests and pipelines).
    #[must_use]
    pub fn from_reader(preset: Vec<PathBuf>, input: impl BufRead + 'static) -> Self {
        Self {
            preset,
            input: Input::Reader(Box::new(input)),
        }
    }

    fn read_lines(&mut self) -> Result<Vec<PathBuf>> {
        match self.input {
            Input::Stdin { interactive } => {
                if interactive {
                    eprintln!("Enter directories to scan, one per line (empty line to finish):");
                }
                read_directories(&mut io::stdin().lock())
            }
            Input::Reader(ref mut reader) => read_directories(reader),
        }
    }
}

impl DirectoryPicker for TerminalPicker {
    fn pick_directories(&mut self) -> Result<Vec<PathBuf>> {
        let chosen = if self.preset.is_empty() {
            self.read_lines()?
        } else {
            std::mem::take(&mut self.preset)
        };

        chosen
            .into_iter()
            .map(|dir| {
                std::path::absolute(&dir)
                    .with_context(|| format!("Invalid directory path: {}", dir.display()))
            })
            .collect()
    }
}

/// Read one directory per line until a blank line or end of input.
fn read_directories<R: BufRead + ?Sized>(input: &mut R) -> Result<Vec<PathBuf>> {
    let mut directories = Vec::new();
    let mut line = String::new();
    loop {
        String::clear(&mut line);
        let read = input
            .read_line(&mut line)
            .context("Failed to read directory from stdin")?;
        let trimmed = line.trim();
        if read == 0 || trimmed.is_empty() {
            break;
        }
        directories.push(PathBuf::from(trimmed));
    }
    Ok(directories)
}

/// Streams finder output and deletion results to the terminal.
pub struct TerminalPresenter {
    format: OutputFormat,
    quiet: bool,
    assume_yes: bool,
    shutdown: Option<ShutdownHandler>,
    progress: Option<DeleteProgress>,
}

impl TerminalPresenter {
    #[must_use]
    pub fn new(format: OutputFormat, quiet: bool, assume_yes: bool) -> Self {
        Self {
            format,
            quiet,
            assume_yes,
            shutdown: None,
            progress: None,
        }
    }

    /// Decline deletion once `handler` reports a shutdown request.
    #[must_use]
    pub fn with_shutdown(mut self, handler: ShutdownHandler) -> Self {
        self.shutdown = Some(handler);
        self
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(ShutdownHandler::is_shutdown_requested)
    }

    fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

impl Presenter for TerminalPresenter {
    fn on_run_started(&mut self, request: &FinderRequest) {
        let dirs: Vec<String> = request
            .directories()
            .iter()
            .map(|d| d.display().to_string())
            .collect();
        log::info!("Running duplicate finder on: {}", dirs.join(", "));
    }

    fn on_stream_event(&mut self, event: &StreamEvent) {
        // Write failures (closed pipe) are not worth aborting the run over.
        match event {
            StreamEvent::ProgressChunk { text } => {
                if self.quiet {
                    return;
                }
                if self.is_json() {
                    let _ = write_flush(&mut io::stderr(), text);
                } else {
                    let _ = write_flush(&mut io::stdout(), text);
                }
            }
            StreamEvent::ErrorChunk { text } => {
                let _ = write_flush(&mut io::stderr(), &text.red().to_string());
            }
        }
    }

    fn on_run_finished(&mut self, outcome: &ProcessOutcome) {
        if self.is_json() {
            return;
        }
        match outcome {
            ProcessOutcome::Success { .. } => {
                if !self.quiet {
                    eprintln!("{}", "Finder completed successfully".green());
                }
            }
            ProcessOutcome::Failure { reason } => {
                eprintln!("{} {}", "Finder failed:".red().bold(), reason);
            }
        }
    }

    fn confirm_deletion(&mut self, paths: &[PathBuf]) -> bool {
        if self.shutdown_requested() {
            log::info!("Interrupted; skipping deletion");
            return false;
        }
        if self.assume_yes {
            return true;
        }

        let stdin = io::stdin();
        if !stdin.is_terminal() {
            log::warn!("Refusing to delete without confirmation; pass --yes to skip the prompt");
            return false;
        }

        let mut stderr = io::stderr();
        match confirm(&mut stdin.lock(), &mut stderr, paths) {
            // Ctrl+C while the prompt blocks only sets the flag.
            Ok(answer) => answer && !self.shutdown_requested(),
            Err(e) => {
                log::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }

    fn delete_progress(&mut self, total: usize) -> Option<&dyn DeleteProgressCallback> {
        let hidden = self.quiet || self.is_json();
        let progress = self.progress.insert(DeleteProgress::new(total, hidden));
        Some(progress)
    }

    fn on_deletion_results(&mut self, results: &[DeletionResult]) {
        self.progress = None;
        if self.is_json() {
            return;
        }

        for result in results {
            match result.error {
                Some(ref error) => eprintln!(
                    "{} {}: {}",
                    "FAILED".red().bold(),
                    result.path.display(),
                    error
                ),
                None if !self.quiet => println!("{} {}", "deleted".green(), result.path.display()),
                None => {}
            }
        }

        if !self.quiet {
            println!("{}", DeletionSummary::from_results(results).summary().bold());
        }
    }
}

fn write_flush(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

/// Prompt for a yes/no answer about deleting `paths`.
///
/// Lists the paths, then reads one line; only `y`/`yes` (any case) confirms.
///
/// # Errors
///
/// Returns an error if writing the prompt or reading the answer fails.
pub fn confirm<I: BufRead, O: Write>(
    input: &mut I,
    output: &mut O,
    paths: &[PathBuf],
) -> io::Result<bool> {
    for path in paths {
        writeln!(output, "  {}", path.display())?;
    }
    write!(
        output,
        "Permanently delete {} file(s)? This cannot be undone. [y/N] ",
        paths.len()
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
