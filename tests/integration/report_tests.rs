use dupeshell::report::{parse_report, read_report};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_read_report_written_by_finder() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dupes.txt");
    fs::write(
        &path,
        "'/photos/IMG_0001 (1).jpg'\n'/music/Don'\\''t Stop.mp3'\n\n",
    )
    .unwrap();

    let paths = read_report(&path).unwrap();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("/photos/IMG_0001 (1).jpg"),
            PathBuf::from("/music/Don't Stop.mp3"),
        ]
    );
}

#[test]
fn test_read_missing_report_has_context() {
    let dir = tempdir().unwrap();
    let err = read_report(&dir.path().join("absent.txt")).unwrap_err();
    assert!(err.to_string().starts_with("Failed to read finder report"));
}

#[test]
fn test_unquoted_lines_are_trimmed() {
    assert_eq!(
        parse_report("  /plain/path.txt  \r\n"),
        vec![PathBuf::from("/plain/path.txt")]
    );
}

#[test]
fn test_empty_report() {
    assert!(parse_report("").is_empty());
    assert!(parse_report("\n\n").is_empty());
}
