use dupecull::cli::Cli;
use dupecull::config::Settings;
use dupecull::error::ExitCode;
use dupecull::session::{Session, SessionSummary, DELETE_PROMPT, ORDINALS_PROMPT};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn run_session(
    root: &Path,
    settings: Settings,
    answers: &str,
) -> (anyhow::Result<SessionSummary>, String) {
    let mut session = Session::new(settings, Cursor::new(answers.as_bytes().to_vec()), Vec::new());
    let result = session.run(root);
    (result, String::from_utf8(session.into_output()).unwrap())
}

fn abcd_tree() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("A"), b"xxxxxxxxxx").unwrap();
    fs::write(dir.path().join("B"), b"xxxxxxxxxx").unwrap();
    fs::write(dir.path().join("C"), b"yyyyyyyyyy").unwrap();
    fs::write(dir.path().join("D"), b"zzzzzzzzzzzzzzzzzzzz").unwrap();
    dir
}

#[test]
fn test_full_session_transcript() {
    let dir = abcd_tree();
    let root = dir.path();

    let (result, output) = run_session(root, Settings::default(), "\n1\nyes\nyes\n1\n");
    let summary = result.unwrap();

    let a = root.join("A").display().to_string();
    let b = root.join("B").display().to_string();
    let c = root.join("C").display().to_string();
    let d = root.join("D").display().to_string();
    let expected = format!(
        "Enter file format:\n\
         \nSize sorting options:\n1. Descending\n2. Ascending\n\nEnter a sorting option:\n\
         \n20 bytes\n{d}\n\n\
         \n10 bytes\n{a}\n{b}\n{c}\n\n\
         \nCheck for duplicates?\n\
         \n10 bytes\nHash: 336311a016184326ddbdd61edd4eeb52\n1. {a}\n2. {b}\n\n\
         Delete files?\n\
         Enter file numbers to delete:\n\
         \nTotal freed up space: 10 bytes\n"
    );
    assert_eq!(output, expected);

    assert_eq!(summary.files_indexed, 4);
    assert_eq!(summary.duplicate_sets, Some(1));
    assert!(!root.join("A").exists());
    assert!(root.join("B").exists());
}

#[test]
fn test_out_of_range_ordinal_is_ignored() {
    let dir = abcd_tree();

    let (result, output) = run_session(dir.path(), Settings::default(), "\n2\nyes\nyes\n1 5\n");
    let deletion = result.unwrap().deletion.unwrap();

    assert_eq!(deletion.bytes_freed, 10);
    assert_eq!(deletion.skipped, vec![5]);
    assert!(output.ends_with("Total freed up space: 10 bytes\n"));
}

#[test]
fn test_suffix_filter_limits_listing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    fs::write(dir.path().join("b.txt"), b"same").unwrap();
    fs::write(dir.path().join("c.bin"), b"same").unwrap();

    let (result, output) = run_session(dir.path(), Settings::default(), ".txt\n1\nno\n");

    assert_eq!(result.unwrap().files_indexed, 2);
    assert!(!output.contains("c.bin"));
}

#[test]
fn test_invalid_answers_reprompt() {
    let dir = abcd_tree();

    let answers = "\n3\n1\nmaybe\nyes\nyes\n1,2\n2\n";
    let (result, output) = run_session(dir.path(), Settings::default(), answers);

    assert_eq!(result.unwrap().deletion.unwrap().bytes_freed, 10);
    assert_eq!(output.matches("Wrong option").count(), 2);
    assert_eq!(output.matches("Wrong format").count(), 1);
    assert_eq!(output.matches(ORDINALS_PROMPT).count(), 2);
    assert!(dir.path().join("A").exists());
    assert!(!dir.path().join("B").exists());
}

#[test]
fn test_declining_deletion_keeps_files() {
    let dir = abcd_tree();

    let (result, output) = run_session(dir.path(), Settings::default(), "\n1\nyes\nno\n");
    let summary = result.unwrap();

    assert!(summary.deletion.is_none());
    assert!(output.contains(DELETE_PROMPT));
    assert!(!output.contains("Total freed up space"));
    assert!(dir.path().join("A").exists());
}

#[test]
fn test_whitespace_only_ordinals_delete_nothing() {
    let dir = abcd_tree();

    let (result, output) = run_session(dir.path(), Settings::default(), "\n1\nyes\nyes\n   \n");

    assert_eq!(result.unwrap().deletion.unwrap().success_count(), 0);
    assert!(output.ends_with("Total freed up space: 0 bytes\n"));
}

#[test]
fn test_input_closed_mid_session_is_an_error() {
    let dir = abcd_tree();
    let (result, _) = run_session(dir.path(), Settings::default(), "\n1\n");
    assert!(result.is_err());
}

#[test]
fn test_missing_root_directory_fails() {
    let dir = tempdir().unwrap();
    let (result, _) = run_session(&dir.path().join("gone"), Settings::default(), "\n1\n");

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Path not found"));
}

#[test]
fn test_run_app_without_path_is_usage_error() {
    use clap::Parser;

    let cli = Cli::try_parse_from(["dupecull", "--quiet"]).unwrap();
    let code = dupecull::run_app(cli).unwrap();
    assert_eq!(code, ExitCode::UsageError);
}
