use anyhow::Result;
use dupeshell::actions::DeletionResult;
use dupeshell::bridge::terminal::TerminalPicker;
use dupeshell::bridge::{DirectoryPicker, Presenter, Session};
use dupeshell::finder::{FinderCommand, FinderRequest, Orchestrator, ProcessOutcome, StreamEvent};
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::tempdir;

struct NoPicker;

impl DirectoryPicker for NoPicker {
    fn pick_directories(&mut self) -> Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}

/// Records everything in the order the session reports it.
#[derive(Default)]
struct Transcript {
    lines: Vec<String>,
    approve: bool,
}

impl Presenter for Transcript {
    fn on_run_started(&mut self, request: &FinderRequest) {
        self.lines.push(format!("start {}", request.directories().len()));
    }

    fn on_stream_event(&mut self, event: &StreamEvent) {
        let kind = if event.is_error() { "err" } else { "out" };
        self.lines.push(format!("{} {}", kind, event.text().trim_end()));
    }

    fn on_run_finished(&mut self, outcome: &ProcessOutcome) {
        self.lines.push(format!("done {}", outcome.is_success()));
    }

    fn confirm_deletion(&mut self, paths: &[PathBuf]) -> bool {
        self.lines.push(format!("confirm {}", paths.len()));
        self.approve
    }

    fn on_deletion_results(&mut self, results: &[DeletionResult]) {
        for result in results {
            self.lines.push(format!("deleted {}", result.success));
        }
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_outcome_is_reported_after_all_output() {
    let command = FinderCommand::new(
        "sh",
        [
            "-c",
            "printf 'one\\n'; sleep 0.1; printf 'two\\n'; exit 1",
            "finder",
        ],
    );
    let mut session = Session::new(Orchestrator::new(command), NoPicker, Transcript::default());
    let request = FinderRequest::new(vec![PathBuf::from("/a"), PathBuf::from("/b")]).unwrap();

    let outcome = session.run_duplicate_finder(&request).await;

    assert_eq!(outcome.to_string(), "Process exited with code 1");
    assert_eq!(
        session.presenter().lines,
        vec!["start 2", "out one", "out two", "done false"]
    );
}

#[tokio::test]
async fn test_delete_files_through_session() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("copy.txt");
    fs::write(&file, b"copy").unwrap();

    let mut session = Session::new(
        Orchestrator::new(FinderCommand::new("true", Vec::<String>::new())),
        NoPicker,
        Transcript::default(),
    );
    let results = session
        .delete_files(&[file.clone(), dir.path().join("missing.txt")])
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(
        session.presenter().lines,
        vec!["deleted true", "deleted false"]
    );
    assert!(!file.exists());
}

#[test]
fn test_terminal_picker_feeds_session() {
    let input = Cursor::new("/photos\n/backup\n\n");
    let mut session = Session::new(
        Orchestrator::new(FinderCommand::new("true", Vec::<String>::new())),
        TerminalPicker::from_reader(Vec::new(), input),
        Transcript::default(),
    );

    let dirs = session.select_directories().unwrap();
    assert_eq!(dirs, vec![PathBuf::from("/photos"), PathBuf::from("/backup")]);

    let request = FinderRequest::new(dirs).unwrap();
    assert_eq!(request.directories().len(), 2);
}

#[test]
fn test_no_selection_cannot_build_request() {
    let mut session = Session::new(
        Orchestrator::new(FinderCommand::new("true", Vec::<String>::new())),
        NoPicker,
        Transcript::default(),
    );
    let dirs = session.select_directories().unwrap();
    assert!(FinderRequest::new(dirs).is_err());
}
