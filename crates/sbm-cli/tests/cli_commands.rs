//! Integration tests for the sbm CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sbm() -> Command {
    Command::cargo_bin("sbm").unwrap()
}

/// Start a seeded run in `dir`, feeding `input` to the shell.
fn new_run(dir: &TempDir, input: &str) -> assert_cmd::assert::Assert {
    sbm()
        .current_dir(dir.path())
        .args(["new", "--seed", "42"])
        .write_stdin(input)
        .assert()
}

// ---------------------------------------------------------------------------
// new / continue
// ---------------------------------------------------------------------------

#[test]
fn new_run_rolls_and_saves() {
    let dir = TempDir::new().unwrap();
    new_run(&dir, "roll\nquit\n")
        .success()
        .stdout(predicate::str::contains("Run started: Normal mode (seed 42)"))
        .stdout(predicate::str::contains("Track Type Roll"))
        .stdout(predicate::str::contains("Room 1: Skipping curse check"));

    let saved = fs::read_to_string(dir.path().join("superbeatmaker.json")).unwrap();
    assert!(saved.contains("\"phase\":\"mutation\""));
}

#[test]
fn new_run_with_mode_and_custom_save() {
    let dir = TempDir::new().unwrap();
    sbm()
        .current_dir(dir.path())
        .args(["--save", "mine.json", "new", "--mode", "quick", "--seed", "1"])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quick mode"));
    assert!(dir.path().join("mine.json").exists());
}

#[test]
fn unknown_mode_fails() {
    let dir = TempDir::new().unwrap();
    sbm()
        .current_dir(dir.path())
        .args(["new", "--mode", "nightmare"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: unknown mode: nightmare"));
}

#[test]
fn manual_track_type() {
    let dir = TempDir::new().unwrap();
    sbm()
        .current_dir(dir.path())
        .args(["new", "--manual", "--seed", "5"])
        .write_stdin("type vocal chop\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Track Type chosen: Vocal Chop"));
}

#[test]
fn out_of_phase_command_is_reported() {
    let dir = TempDir::new().unwrap();
    new_run(&dir, "finalize\naccept\nquit\n")
        .success()
        .stdout(predicate::str::contains("Nothing happened"))
        .stdout(predicate::str::contains("nothing to accept"));
}

#[test]
fn unknown_shell_command_is_reported() {
    let dir = TempDir::new().unwrap();
    new_run(&dir, "dance\nquit\n")
        .success()
        .stdout(predicate::str::contains("unknown command: dance"));
}

#[test]
fn new_run_over_a_save_says_so() {
    let dir = TempDir::new().unwrap();
    new_run(&dir, "quit\n")
        .success()
        .stdout(predicate::str::contains("Replacing the saved run").not());
    new_run(&dir, "quit\n")
        .success()
        .stdout(predicate::str::contains("Replacing the saved run in superbeatmaker.json."));
}

#[test]
fn continue_resumes_saved_run() {
    let dir = TempDir::new().unwrap();
    new_run(&dir, "roll\nquit\n").success();
    sbm()
        .current_dir(dir.path())
        .arg("continue")
        .write_stdin("status\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[room 1 | mutation]"));
}

#[test]
fn continue_without_save_fails() {
    let dir = TempDir::new().unwrap();
    sbm()
        .current_dir(dir.path())
        .arg("continue")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no saved run"));
}

#[test]
fn ended_run_cannot_continue() {
    let dir = TempDir::new().unwrap();
    new_run(&dir, "end\ntag phoenix\nquit\n")
        .success()
        .stdout(predicate::str::contains("Run ended"))
        .stdout(predicate::str::contains("Tag added: Phoenix"));
    sbm()
        .current_dir(dir.path())
        .arg("continue")
        .assert()
        .failure()
        .stderr(predicate::str::contains("finished"));
}

// ---------------------------------------------------------------------------
// status / tables
// ---------------------------------------------------------------------------

#[test]
fn status_shows_saved_run() {
    let dir = TempDir::new().unwrap();
    new_run(&dir, "roll\nquit\n").success();
    sbm()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Normal run, room 1"))
        .stdout(predicate::str::contains("Current track"));
}

#[test]
fn tables_lists_every_table() {
    sbm()
        .arg("tables")
        .assert()
        .success()
        .stdout(predicate::str::contains("Track Types"))
        .stdout(predicate::str::contains("Wildcard"))
        .stdout(predicate::str::contains("Mutations"))
        .stdout(predicate::str::contains("Target Curses"))
        .stdout(predicate::str::contains("Mix Curses"))
        .stdout(predicate::str::contains("Curse Targeting"))
        .stdout(predicate::str::contains("Clean Sweep"));
}

// ---------------------------------------------------------------------------
// export / import
// ---------------------------------------------------------------------------

#[test]
fn export_json_to_stdout() {
    let dir = TempDir::new().unwrap();
    new_run(&dir, "roll\nquit\n").success();
    sbm()
        .current_dir(dir.path())
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mode\": \"normal\""));
}

#[test]
fn export_markdown_log_to_file() {
    let dir = TempDir::new().unwrap();
    new_run(&dir, "roll\nquit\n").success();
    let out = dir.path().join("log.md");
    sbm()
        .current_dir(dir.path())
        .args(["export", "--format", "md", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));
    let content = fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("# Super Beatmaker Run Log"));
    assert!(content.contains("## Room 1"));
}

#[test]
fn export_unknown_format_fails() {
    let dir = TempDir::new().unwrap();
    new_run(&dir, "quit\n").success();
    sbm()
        .current_dir(dir.path())
        .args(["export", "--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported format"));
}

#[test]
fn import_round_trip() {
    let source = TempDir::new().unwrap();
    new_run(&source, "roll\nquit\n").success();
    let exported = source.path().join("run.json");
    sbm()
        .current_dir(source.path())
        .args(["export", "-o"])
        .arg(&exported)
        .assert()
        .success();

    let target = TempDir::new().unwrap();
    sbm()
        .current_dir(target.path())
        .arg("import")
        .arg(&exported)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported Normal run (room 1)"));
    assert!(target.path().join("superbeatmaker.json").exists());
}

#[test]
fn import_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.json");
    fs::write(&bad, "not a run").unwrap();
    sbm()
        .current_dir(dir.path())
        .arg("import")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid file"));
    assert!(!dir.path().join("superbeatmaker.json").exists());
}
