use dupeshell::finder::{
    create_event_channel, EventReceiver, FailureReason, FinderCommand, FinderRequest,
    Orchestrator, ProcessOutcome, StreamEvent,
};
use dupeshell::signal::ShutdownHandler;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn request(dirs: &[&str]) -> FinderRequest {
    FinderRequest::new(dirs.iter().map(PathBuf::from).collect()).unwrap()
}

/// A finder that runs `script` through `sh -c`, with request args as `$@`.
fn sh_finder(script: &str) -> Orchestrator {
    Orchestrator::new(FinderCommand::new("sh", ["-c", script, "finder"]))
}

fn drain(mut rx: EventReceiver) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn progress_text(events: &[StreamEvent]) -> String {
    events
        .iter()
        .filter(|e| !e.is_error())
        .map(StreamEvent::text)
        .collect()
}

fn error_text(events: &[StreamEvent]) -> String {
    events
        .iter()
        .filter(|e| e.is_error())
        .map(StreamEvent::text)
        .collect()
}

#[test]
fn test_request_args_exact_order() {
    let request = request(&["/a", "/b"])
        .with_recursive(true)
        .with_hash_algorithm("sha256")
        .unwrap();
    assert_eq!(
        request.to_args(),
        vec![
            OsString::from("/a"),
            OsString::from("/b"),
            OsString::from("-r"),
            OsString::from("--hash-algorithm"),
            OsString::from("sha256"),
        ]
    );
}

#[test]
fn test_request_without_options_is_just_directories() {
    assert_eq!(
        request(&["/photos"]).to_args(),
        vec![OsString::from("/photos")]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_finder_receives_args_in_order() {
    let orchestrator = sh_finder("for a in \"$@\"; do printf '%s\\n' \"$a\"; done");
    let request = request(&["/a", "/b c"])
        .with_recursive(true)
        .with_hash_algorithm("md5")
        .unwrap()
        .with_output_file("/tmp/out.txt");
    let (tx, rx) = create_event_channel();

    let outcome = orchestrator.run(&request, &tx).await;
    drop(tx);

    assert_eq!(
        outcome.raw_output(),
        Some("/a\n/b c\n-r\n--hash-algorithm\nmd5\n-o\n/tmp/out.txt\n")
    );
    assert_eq!(progress_text(&drain(rx)), outcome.raw_output().unwrap());
}

#[cfg(unix)]
#[tokio::test]
async fn test_streamed_chunks_arrive_separately() {
    let orchestrator = sh_finder("printf '10%%\\n'; sleep 0.3; printf '20%%\\n'");
    let (tx, rx) = create_event_channel();

    let outcome = orchestrator.run(&request(&["/a"]), &tx).await;
    drop(tx);

    assert_eq!(
        outcome,
        ProcessOutcome::Success {
            raw_output: "10%\n20%\n".into()
        }
    );
    let events = drain(rx);
    assert_eq!(
        events,
        vec![
            StreamEvent::ProgressChunk {
                text: "10%\n".into()
            },
            StreamEvent::ProgressChunk {
                text: "20%\n".into()
            },
        ]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_stderr_is_streamed_but_not_accumulated() {
    let orchestrator = sh_finder("printf 'scanning\\n'; printf 'permission denied: /x\\n' >&2");
    let (tx, rx) = create_event_channel();

    let outcome = orchestrator.run(&request(&["/a"]), &tx).await;
    drop(tx);

    assert_eq!(outcome.raw_output(), Some("scanning\n"));
    let events = drain(rx);
    assert_eq!(error_text(&events), "permission denied: /x\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_stderr_does_not_fail_successful_run() {
    let orchestrator = sh_finder("printf 'warning\\n' >&2; exit 0");
    let (tx, _rx) = create_event_channel();

    let outcome = orchestrator.run(&request(&["/a"]), &tx).await;
    assert!(outcome.is_success());
    assert_eq!(outcome.raw_output(), Some(""));
}

#[cfg(unix)]
#[tokio::test]
async fn test_non_zero_exit_reports_code() {
    let orchestrator = sh_finder("printf 'partial\\n'; exit 2");
    let (tx, rx) = create_event_channel();

    let outcome = orchestrator.run(&request(&["/a"]), &tx).await;
    drop(tx);

    assert_eq!(outcome.to_string(), "Process exited with code 2");
    assert_eq!(outcome.failure_reason().and_then(FailureReason::exit_code), Some(2));
    // Output seen before the failure was still streamed
    assert_eq!(progress_text(&drain(rx)), "partial\n");
}

#[tokio::test]
async fn test_missing_interpreter_is_spawn_failure() {
    let orchestrator = Orchestrator::new(FinderCommand::script(
        "dupeshell-no-such-interpreter",
        "duplicate_finder.py",
    ));
    let (tx, rx) = create_event_channel();

    let outcome = orchestrator.run(&request(&["/a"]), &tx).await;
    drop(tx);

    match outcome {
        ProcessOutcome::Failure {
            reason: FailureReason::Spawn { program, .. },
        } => assert_eq!(program, "dupeshell-no-such-interpreter"),
        other => panic!("expected spawn failure, got {:?}", other),
    }
    assert!(drain(rx).is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_cancellation_kills_finder() {
    let shutdown = ShutdownHandler::new();
    let orchestrator = sh_finder("printf 'started\\n'; exec sleep 10").with_shutdown(shutdown.clone());
    let (tx, _rx) = create_event_channel();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.request_shutdown();
    });

    let started = Instant::now();
    let outcome = orchestrator.run(&request(&["/a"]), &tx).await;

    assert_eq!(outcome, ProcessOutcome::failure(FailureReason::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[cfg(unix)]
#[tokio::test]
async fn test_shutdown_requested_before_run_cancels_immediately() {
    let shutdown = ShutdownHandler::new();
    shutdown.request_shutdown();
    let orchestrator = sh_finder("exec sleep 10").with_shutdown(shutdown);
    let (tx, _rx) = create_event_channel();

    let started = Instant::now();
    let outcome = orchestrator.run(&request(&["/a"]), &tx).await;

    assert_eq!(outcome, ProcessOutcome::failure(FailureReason::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[cfg(unix)]
#[tokio::test]
async fn test_dropped_receiver_does_not_fail_run() {
    let orchestrator = sh_finder("printf 'a\\n'; printf 'b\\n' >&2");
    let (tx, rx) = create_event_channel();
    drop(rx);

    let outcome = orchestrator.run(&request(&["/a"]), &tx).await;
    assert_eq!(outcome.raw_output(), Some("a\n"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_runs_are_independent() {
    let orchestrator = sh_finder("printf '%s\\n' \"$1\"");
    let (tx, _rx) = create_event_channel();

    let first = orchestrator.run(&request(&["/one"]), &tx).await;
    let second = orchestrator.run(&request(&["/two"]), &tx).await;

    assert_eq!(first.raw_output(), Some("/one\n"));
    assert_eq!(second.raw_output(), Some("/two\n"));
}
