//! Running the external finder and streaming its output.
//!
//! # Overview
//!
//! [`Orchestrator::run`] spawns one finder process per call and drives it to
//! completion on the current task:
//!
//! - every stdout chunk is appended to the result buffer and sent as a
//!   [`StreamEvent::ProgressChunk`] as soon as it is read
//! - every stderr chunk is sent as a [`StreamEvent::ErrorChunk`]
//! - when both pipes close, the exit status decides the [`ProcessOutcome`]
//!
//! All failures (spawn errors, non-zero exits, timeouts, cancellation) become
//! `ProcessOutcome::Failure`; `run` never returns an error or panics. Events
//! are only sent while `run` is executing, so every event a subscriber sees
//! precedes the outcome.
//!
//! # Example
//!
//! ```no_run
//! use dupeshell::finder::{create_event_channel, FinderCommand, FinderRequest, Orchestrator};
//!
//! # async fn demo() {
//! let orchestrator = Orchestrator::new(FinderCommand::script("python3", "duplicate_finder.py"));
//! let request = FinderRequest::new(vec!["/photos".into()]).unwrap().with_recursive(true);
//!
//! let (tx, mut rx) = create_event_channel();
//! let outcome = orchestrator.run(&request, &tx).await;
//! drop(tx);
//!
//! while let Some(event) = rx.recv().await {
//!     print!("{}", event.text());
//! }
//! println!("{}", outcome);
//! # }
//! ```

use std::ffi::OsString;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};

use super::events::{ChunkDecoder, EventSender, StreamEvent};
use super::request::FinderRequest;
use super::resolve::FinderCommand;
use crate::signal::ShutdownHandler;

/// Read buffer size for each of the child's pipes.
const PIPE_BUFFER_SIZE: usize = 8 * 1024;

/// Why a finder run did not succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FailureReason {
    /// The finder could not be started at all.
    #[error("Failed to start {program}: {message}")]
    Spawn { program: String, message: String },

    /// The finder ran and reported failure.
    #[error("Process exited with code {code}")]
    NonZeroExit { code: i32 },

    /// The finder was killed without an exit code (e.g. by a signal).
    #[error("Process terminated without an exit code ({status})")]
    Terminated { status: String },

    /// The finder exceeded the configured timeout and was killed.
    #[error("Process timed out after {}s and was terminated", .after.as_secs())]
    TimedOut { after: Duration },

    /// The run was cancelled (Ctrl+C) and the finder was killed.
    #[error("Process cancelled by user")]
    Cancelled,

    /// Reading the finder's output failed.
    #[error("Failed to read finder output: {message}")]
    Io { message: String },
}

impl FailureReason {
    /// Exit code reported by the finder, when there was one.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code } => Some(*code),
            _ => None,
        }
    }
}

/// Terminal result of one finder run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Exit code 0; `raw_output` is all stdout text in arrival order.
    Success { raw_output: String },
    /// Anything else.
    Failure { reason: FailureReason },
}

impl ProcessOutcome {
    #[must_use]
    pub fn failure(reason: FailureReason) -> Self {
        Self::Failure { reason }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Accumulated stdout, for successful runs.
    #[must_use]
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::Success { raw_output } => Some(raw_output),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason } => Some(reason),
        }
    }

    /// Convert into a `Result`, for callers that prefer `?`.
    ///
    /// # Errors
    ///
    /// Returns the failure reason for `Failure` outcomes.
    pub fn into_result(self) -> Result<String, FailureReason> {
        match self {
            Self::Success { raw_output } => Ok(raw_output),
            Self::Failure { reason } => Err(reason),
        }
    }
}

impl std::fmt::Display for ProcessOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success { raw_output } => {
                write!(f, "Finder completed ({} bytes of output)", raw_output.len())
            }
            Self::Failure { reason } => write!(f, "{}", reason),
        }
    }
}

/// Spawns and supervises the external finder.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    command: FinderCommand,
    timeout: Option<Duration>,
    shutdown: Option<ShutdownHandler>,
}

enum RunEnd {
    Exited(std::io::Result<(String, ExitStatus)>),
    TimedOut(Duration),
    Cancelled,
}

impl Orchestrator {
    /// Create an orchestrator with no timeout and no cancellation source.
    #[must_use]
    pub fn new(command: FinderCommand) -> Self {
        Self {
            command,
            timeout: None,
            shutdown: None,
        }
    }

    /// Kill the finder if it runs longer than `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Kill the finder when `handler` requests shutdown.
    #[must_use]
    pub fn with_shutdown(mut self, handler: ShutdownHandler) -> Self {
        self.shutdown = Some(handler);
        self
    }

    #[must_use]
    pub fn command(&self) -> &FinderCommand {
        &self.command
    }

    /// Run the finder for `request`, streaming output to `events`.
    ///
    /// Send failures on `events` (receiver dropped) are ignored; the run still
    /// completes and its outcome is returned.
    pub async fn run(&self, request: &FinderRequest, events: &EventSender) -> ProcessOutcome {
        let args = request.to_args();
        log::debug!("Spawning finder: {}", self.command.display_with(&args));

        let mut child = match self.spawn(&args) {
            Ok(child) => child,
            Err(e) => {
                let program = self.command.program.to_string_lossy().into_owned();
                log::warn!("Failed to spawn {}: {}", program, e);
                return ProcessOutcome::failure(FailureReason::Spawn {
                    program,
                    message: e.to_string(),
                });
            }
        };
        log::info!(
            "Finder started (pid {})",
            child.id().map_or_else(|| "?".to_string(), |id| id.to_string())
        );

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            terminate(&mut child).await;
            return ProcessOutcome::failure(FailureReason::Io {
                message: "child pipes were not captured".to_string(),
            });
        };

        let deadline = async {
            match self.timeout {
                Some(after) => {
                    tokio::time::sleep(after).await;
                    after
                }
                None => std::future::pending().await,
            }
        };
        let cancelled = async {
            match self.shutdown {
                Some(ref handler) => handler.cancelled().await,
                None => std::future::pending().await,
            }
        };

        let end = tokio::select! {
            result = drive(&mut child, stdout, stderr, events) => RunEnd::Exited(result),
            after = deadline => RunEnd::TimedOut(after),
            () = cancelled => RunEnd::Cancelled,
        };

        let outcome = match end {
            RunEnd::Exited(Ok((raw_output, status))) => outcome_from_status(raw_output, status),
            RunEnd::Exited(Err(e)) => {
                terminate(&mut child).await;
                ProcessOutcome::failure(FailureReason::Io {
                    message: e.to_string(),
                })
            }
            RunEnd::TimedOut(after) => {
                terminate(&mut child).await;
                ProcessOutcome::failure(FailureReason::TimedOut { after })
            }
            RunEnd::Cancelled => {
                terminate(&mut child).await;
                ProcessOutcome::failure(FailureReason::Cancelled)
            }
        };

        match outcome {
            ProcessOutcome::Success { ref raw_output } => {
                log::info!("Finder succeeded ({} bytes of output)", raw_output.len());
            }
            ProcessOutcome::Failure { ref reason } => log::warn!("Finder failed: {}", reason),
        }
        outcome
    }

    fn spawn(&self, args: &[OsString]) -> std::io::Result<Child> {
        Command::new(&self.command.program)
            .args(&self.command.leading_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
    }
}

fn outcome_from_status(raw_output: String, status: ExitStatus) -> ProcessOutcome {
    match status.code() {
        Some(0) => ProcessOutcome::Success { raw_output },
        Some(code) => ProcessOutcome::failure(FailureReason::NonZeroExit { code }),
        None => ProcessOutcome::failure(FailureReason::Terminated {
            status: status.to_string(),
        }),
    }
}

async fn terminate(child: &mut Child) {
    if let Err(e) = child.kill().await {
        log::debug!("Failed to kill finder process: {}", e);
    }
}

/// Pump both pipes until they close, then reap the child.
async fn drive<O, E>(
    child: &mut Child,
    mut stdout: O,
    mut stderr: E,
    events: &EventSender,
) -> std::io::Result<(String, ExitStatus)>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut out_buf = vec![0u8; PIPE_BUFFER_SIZE];
    let mut err_buf = vec![0u8; PIPE_BUFFER_SIZE];
    let mut out_decoder = ChunkDecoder::default();
    let mut err_decoder = ChunkDecoder::default();
    let mut out_open = true;
    let mut err_open = true;
    let mut accumulated = String::new();

    while out_open || err_open {
        tokio::select! {
            read = stdout.read(&mut out_buf), if out_open => {
                let n = read?;
                let text = if n == 0 {
                    out_open = false;
                    out_decoder.finish()
                } else {
                    out_decoder.push(&out_buf[..n])
                };
                if let Some(text) = text {
                    accumulated.push_str(&text);
                    let _ = events.send(StreamEvent::ProgressChunk { text });
                }
            }
            read = stderr.read(&mut err_buf), if err_open => {
                let n = read?;
                let text = if n == 0 {
                    err_open = false;
                    err_decoder.finish()
                } else {
                    err_decoder.push(&err_buf[..n])
                };
                if let Some(text) = text {
                    log::trace!("finder stderr: {}", text.trim_end());
                    let _ = events.send(StreamEvent::ErrorChunk { text });
                }
            }
        }
    }

    let status = child.wait().await?;
    Ok((accumulated, status))
}
