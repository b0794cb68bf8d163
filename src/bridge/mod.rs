//! UI bridge between a front end and the finder/deleter core.
//!
//! A [`Session`] is the explicit context handed to every UI operation. It owns
//! the orchestrator, a [`DirectoryPicker`] and a [`Presenter`]; there is no
//! global window or shared mutable state. Each operation mirrors one request a
//! front end can make:
//!
//! - [`Session::select_directories`]: ask the user for directories
//! - [`Session::run_duplicate_finder`]: run the finder, forwarding streamed
//!   output to the presenter as it arrives
//! - [`Session::delete_files`]: delete selected files and report per-file results
//!
//! [`terminal`] provides the stdin/stdout implementations used by the CLI.

pub mod terminal;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::actions::{DeleteProgressCallback, Deleter, DeletionResult};
use crate::finder::{create_event_channel, FinderRequest, Orchestrator, ProcessOutcome, StreamEvent};

/// Source of user-selected directories (a folder picker, stdin, ...).
pub trait DirectoryPicker {
    /// Ask the user for one or more directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection could not be read.
    fn pick_directories(&mut self) -> Result<Vec<PathBuf>>;
}

/// Renders finder output and deletion results.
pub trait Presenter {
    /// Called once before the finder is spawned.
    fn on_run_started(&mut self, _request: &FinderRequest) {}

    /// Called for every streamed chunk, in arrival order.
    fn on_stream_event(&mut self, event: &StreamEvent);

    /// Called once after the last stream event.
    fn on_run_finished(&mut self, _outcome: &ProcessOutcome) {}

    /// Ask the user whether `paths` should be permanently deleted.
    fn confirm_deletion(&mut self, paths: &[PathBuf]) -> bool;

    /// Progress hooks for an upcoming batch of `total` deletions.
    fn delete_progress(&mut self, _total: usize) -> Option<&dyn DeleteProgressCallback> {
        None
    }

    /// Called with the per-file outcomes of a batch deletion.
    fn on_deletion_results(&mut self, _results: &[DeletionResult]) {}
}

/// Per-window UI context.
pub struct Session<P, R> {
    orchestrator: Orchestrator,
    picker: P,
    presenter: R,
}

impl<P: DirectoryPicker, R: Presenter> Session<P, R> {
    #[must_use]
    pub fn new(orchestrator: Orchestrator, picker: P, presenter: R) -> Self {
        Self {
            orchestrator,
            picker,
            presenter,
        }
    }

    #[must_use]
    pub fn presenter(&self) -> &R {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut R {
        &mut self.presenter
    }

    /// Delegate directory selection to the picker.
    ///
    /// # Errors
    ///
    /// Propagates picker errors.
    pub fn select_directories(&mut self) -> Result<Vec<PathBuf>> {
        let directories = self.picker.pick_directories()?;
        log::debug!("Selected {} director(ies)", directories.len());
        Ok(directories)
    }

    /// Run the finder and stream its output to the presenter.
    ///
    /// Returns after the presenter has seen every event and
    /// `on_run_finished`.
    pub async fn run_duplicate_finder(&mut self, request: &FinderRequest) -> ProcessOutcome {
        self.presenter.on_run_started(request);

        let (tx, mut rx) = create_event_channel();
        let orchestrator = &self.orchestrator;
        let presenter = &mut self.presenter;

        let run = async move {
            let outcome = orchestrator.run(request, &tx).await;
            // Closing the channel ends the forwarding loop.
            drop(tx);
            outcome
        };
        let forward = async {
            while let Some(event) = rx.recv().await {
                presenter.on_stream_event(&event);
            }
        };

        let (outcome, ()) = tokio::join!(run, forward);
        self.presenter.on_run_finished(&outcome);
        outcome
    }

    /// Permanently delete `paths` and report the results to the presenter.
    pub async fn delete_files<Q: AsRef<Path>>(&mut self, paths: &[Q]) -> Vec<DeletionResult> {
        delete_with_presenter(&mut self.presenter, paths).await
    }
}

/// Delete `paths`, wiring the presenter's progress hooks and reporting the
/// results to it. Used directly by front ends that never run the finder.
pub async fn delete_with_presenter<R, Q>(presenter: &mut R, paths: &[Q]) -> Vec<DeletionResult>
where
    R: Presenter + ?Sized,
    Q: AsRef<Path>,
{
    let results = {
        let mut deleter = Deleter::new();
        if let Some(callback) = presenter.delete_progress(paths.len()) {
            deleter = deleter.with_callback(callback);
        }
        deleter.delete_all(paths).await
    };
    presenter.on_deletion_results(&results);
    results
}
