//! End-to-end runs of the `guardstack` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn guardstack(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_guardstack"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("GUARDSTACK_LOG")
        .output()
        .expect("failed to run guardstack binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_run_script_reports_each_line() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("canonical.txt"),
        "# canonical scenario\npush 5\npush 7\npop\npop\npop\n",
    )
    .unwrap();

    let output = guardstack(&["run", "canonical.txt"], dir.path());
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("[  4] pop OK 7"), "{}", text);
    assert!(text.contains("[  6] pop FAIL cannot pop from an empty stack"), "{}", text);
    assert!(text.contains("5 commands, 1 failed"), "{}", text);
}

#[test]
fn test_strict_run_fails_on_any_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("empty_pop.txt"), "pop\n").unwrap();

    let output = guardstack(&["run", "empty_pop.txt", "--strict"], dir.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_dump_and_string_stack() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("words.txt"), "push hello world\ndump\n").unwrap();

    let output = guardstack(&["run", "words.txt", "--type", "str"], dir.path());
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("GuardedStack<String>"), "{}", text);
    assert!(text.contains("\"hello world\""), "{}", text);
}

#[test]
fn test_config_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("lenient.json"),
        r#"{ "checksum_policy": "report_only" }"#,
    )
    .unwrap();
    fs::write(dir.path().join("s.txt"), "push 1\nvalidate\n").unwrap();

    let output = guardstack(&["run", "s.txt", "--config", "lenient.json"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("validate OK valid"));
}

#[test]
fn test_bad_inputs_exit_with_context() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.txt"), "push 1\nshove 2\n").unwrap();
    fs::write(dir.path().join("bad.json"), "{ \"checksum_policy\": 1 }").unwrap();

    let output = guardstack(&["run", "bad.txt"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown command 'shove'"));

    let output = guardstack(&["run", "bad.txt", "--config", "bad.json"], dir.path());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid config bad.json"));

    let output = guardstack(&["run", "missing.txt"], dir.path());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read script missing.txt"));
}

#[test]
fn test_demo_runs_for_every_type() {
    let dir = tempfile::tempdir().unwrap();
    for ty in ["i32", "i64", "f64", "char", "str"] {
        let output = guardstack(&["demo", "--type", ty], dir.path());
        assert!(output.status.success(), "demo --type {} failed", ty);
        assert!(stdout(&output).contains("create(1)"));
    }
}
