use dupeshell::cli::{DeleteArgs, OutputFormat, ScanArgs};
use dupeshell::commands;
use dupeshell::config::Config;
use dupeshell::error::ExitCode;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Shell snippet that stores the value following `-o` in `$out`.
const FIND_REPORT_ARG: &str = r#"out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; shift; fi
  shift
done
"#;

fn write_finder(dir: &TempDir, body: &str) -> PathBuf {
    let script = dir.path().join("duplicate_finder.sh");
    fs::write(&script, format!("{}{}", FIND_REPORT_ARG, body)).unwrap();
    script
}

/// Finder that reports `candidates` through the `-o` file.
fn reporting_finder(dir: &TempDir, candidates: &[&Path]) -> PathBuf {
    let lines: String = candidates
        .iter()
        .map(|p| format!("printf \"'%s'\\n\" '{}' >> \"$out\"\n", p.display()))
        .collect();
    write_finder(
        dir,
        &format!("echo \"Found {} candidate(s)\"\n{}", candidates.len(), lines),
    )
}

fn scan_args(dir: &Path, script: PathBuf, report: PathBuf) -> ScanArgs {
    ScanArgs {
        directories: vec![dir.to_path_buf()],
        recursive: true,
        hash_algorithm: None,
        output_file: Some(report),
        script: Some(script),
        interpreter: Some("sh".to_string()),
        timeout: Some(30),
        delete: true,
        yes: true,
        output: OutputFormat::Text,
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_scan_deletes_reported_candidates() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("photo.jpg");
    let copy = dir.path().join("photo (1).jpg");
    fs::write(&original, b"same").unwrap();
    fs::write(&copy, b"same").unwrap();

    let script = reporting_finder(&dir, &[&copy]);
    let report = dir.path().join("dupes.txt");

    let code = commands::scan(scan_args(dir.path(), script, report.clone()), Config::default(), true)
        .await
        .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(original.exists());
    assert!(!copy.exists());
    assert!(report.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_scan_without_report_deletes_nothing() {
    let dir = tempdir().unwrap();
    let keep = dir.path().join("unique.txt");
    fs::write(&keep, b"unique").unwrap();

    let script = write_finder(&dir, "echo \"No duplicate files found.\"\n");
    let report = dir.path().join("dupes.txt");

    let code = commands::scan(scan_args(dir.path(), script, report.clone()), Config::default(), true)
        .await
        .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(keep.exists());
    assert!(!report.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_scan_ignores_report_from_earlier_run() {
    let dir = tempdir().unwrap();
    let keep = dir.path().join("keep_me.txt");
    fs::write(&keep, b"keep").unwrap();

    let report = dir.path().join("dupes.txt");
    fs::write(&report, format!("'{}'\n", keep.display())).unwrap();
    let script = write_finder(&dir, "echo \"No duplicate files found.\"\n");

    let code = commands::scan(scan_args(dir.path(), script, report.clone()), Config::default(), true)
        .await
        .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(keep.exists());
    assert!(!report.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_scan_failure_skips_deletion() {
    let dir = tempdir().unwrap();
    let copy = dir.path().join("copy.txt");
    fs::write(&copy, b"copy").unwrap();

    let script = write_finder(
        &dir,
        &format!("printf \"'%s'\\n\" '{}' > \"$out\"\nexit 1\n", copy.display()),
    );
    let report = dir.path().join("dupes.txt");

    let code = commands::scan(scan_args(dir.path(), script, report), Config::default(), true)
        .await
        .unwrap();

    assert_eq!(code, ExitCode::FinderFailed);
    assert!(copy.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_scan_partial_deletion_exit_code() {
    let dir = tempdir().unwrap();
    let copy = dir.path().join("copy.txt");
    fs::write(&copy, b"copy").unwrap();
    let vanished = dir.path().join("vanished.txt");

    let script = reporting_finder(&dir, &[&copy, &vanished]);
    let report = dir.path().join("dupes.txt");

    let code = commands::scan(scan_args(dir.path(), script, report), Config::default(), true)
        .await
        .unwrap();

    assert_eq!(code, ExitCode::PartialDeletion);
    assert!(!copy.exists());
}

#[tokio::test]
async fn test_delete_from_report() {
    let dir = tempdir().unwrap();
    let listed = dir.path().join("it's a copy.txt");
    let direct = dir.path().join("direct.txt");
    fs::write(&listed, b"x").unwrap();
    fs::write(&direct, b"y").unwrap();

    let report = dir.path().join("dupes.txt");
    let quoted = listed.display().to_string().replace('\'', "'\\''");
    fs::write(&report, format!("'{}'\n", quoted)).unwrap();

    let args = DeleteArgs {
        paths: vec![direct.clone()],
        from_report: Some(report),
        yes: true,
        output: OutputFormat::Json,
    };
    let code = commands::delete(args, true).await.unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(!listed.exists());
    assert!(!direct.exists());
}

#[tokio::test]
async fn test_delete_reports_partial_failure() {
    let dir = tempdir().unwrap();
    let present = dir.path().join("present.txt");
    fs::write(&present, b"x").unwrap();

    let args = DeleteArgs {
        paths: vec![present.clone(), dir.path().join("absent.txt")],
        from_report: None,
        yes: true,
        output: OutputFormat::Text,
    };
    let code = commands::delete(args, true).await.unwrap();

    assert_eq!(code, ExitCode::PartialDeletion);
    assert!(!present.exists());
}

#[tokio::test]
async fn test_delete_missing_report_is_error() {
    let dir = tempdir().unwrap();
    let args = DeleteArgs {
        paths: Vec::new(),
        from_report: Some(dir.path().join("absent.txt")),
        yes: true,
        output: OutputFormat::Text,
    };
    let err = commands::delete(args, true).await.unwrap_err();
    assert!(err.to_string().contains("Failed to read finder report"));
}
