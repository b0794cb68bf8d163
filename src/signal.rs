//! Signal handling for cancelling a running finder.
//!
//! This module provides centralized Ctrl+C handling for dupeshell. The
//! shutdown state is an `AtomicBool` for synchronous checks plus a tokio
//! `Notify` so the orchestrator can await cancellation alongside process I/O.
//!
//! # Usage
//!
//! ```rust,no_run
//! use dupeshell::signal::install_handler;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//!
//! // Synchronous check
//! if handler.is_shutdown_requested() {
//!     return;
//! }
//!
//! // Inside async code: resolves once Ctrl+C is pressed
//! # async fn wait(handler: dupeshell::signal::ShutdownHandler) {
//! handler.cancelled().await;
//! # }
//! ```
//!
//! # Exit Codes
//!
//! When a signal is received:
//! - The shutdown flag is set to `true` and async waiters are woken
//! - A message "Interrupted. Stopping finder..." is printed to stderr
//! - The run resolves as cancelled and the application exits with code 130
//!   (128 + SIGINT)

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::sync::Notify;

/// Centralized shutdown handler.
///
/// Cloning is cheap and every clone observes the same state.
///
/// # Thread Safety
///
/// `ShutdownHandler` is `Send` and `Sync`; the signal thread installed by
/// `ctrlc` and the tokio runtime share it.
#[derive(Debug, Clone)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownHandler {
    /// Create a new shutdown handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request a shutdown and wake every task awaiting [`cancelled`](Self::cancelled).
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Wait until shutdown is requested.
    ///
    /// Returns immediately if it already was.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so a concurrent request is not missed.
            notified.as_mut().enable();

            if self.is_shutdown_requested() {
                return;
            }
            notified.await;
        }
    }

    /// Reset the shutdown flag to `false`.
    ///
    /// Used when the process-wide handler is reused across runs.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl Default for ShutdownHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install a Ctrl+C handler that requests shutdown on interrupt.
///
/// Call once, early in startup. Repeated calls (for example from tests that
/// each call `run_app()`) return the already-installed handler after
/// resetting it. If the hook cannot be registered because another one exists,
/// an unhooked handler is returned; manual `request_shutdown()` still works.
///
/// # Errors
///
/// Currently always succeeds; the `Result` is kept so callers do not depend
/// on the fallback behavior.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let hooked = handler.clone();

    match ctrlc::set_handler(move || {
        hooked.request_shutdown();

        let _ = writeln!(std::io::stderr(), "\nInterrupted. Stopping finder...");
        let _ = std::io::stderr().flush();

        log::info!("Shutdown signal received");
    }) {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            Ok(handler)
        }
        Err(e) => {
            if let Some(existing) = GLOBAL_HANDLER.get() {
                existing.reset();
                Ok(existing.clone())
            } else {
                log::debug!("Ctrl+C handler not installed ({}), using unhooked handler", e);
                let fallback = ShutdownHandler::new();
                let _ = GLOBAL_HANDLER.set(fallback.clone());
                Ok(fallback)
            }
        }
    }
}
