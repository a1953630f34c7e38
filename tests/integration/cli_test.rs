//! Command line behavior of the termsite binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use super::helpers::{run_termsite, temp_content, SCENARIO};

fn termsite(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("termsite").expect("binary built");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("TERMSITE_LOG");
    cmd
}

#[test]
fn render_prints_home_page() {
    let (dir, path) = temp_content(SCENARIO);
    termsite(&dir)
        .args(["render", path.to_str().unwrap(), "--speed", "0"])
        .assert()
        .success()
        .stdout("Welcome\nHello\n▹ Go\n");
}

#[test]
fn render_other_page_includes_back_link() {
    let (dir, path) = temp_content(SCENARIO);
    let (stdout, _stderr, code) = run_termsite(
        &["render", path.to_str().unwrap(), "--speed", "0", "--page", "other"],
        dir.path(),
    );

    assert_eq!(code, 0);
    insta::assert_snapshot!(stdout.trim_end(), @r"
    Other
    Bye
    ◃ Restart program
    ");
}

#[test]
fn render_unknown_page_fails_after_inline_error() {
    let (dir, path) = temp_content(SCENARIO);
    termsite(&dir)
        .args(["render", path.to_str().unwrap(), "--speed", "0", "--page", "nope"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error: page 'nope' not found."))
        .stderr(predicate::str::contains("Page 'nope' not found"));
}

#[test]
fn render_missing_content_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");
    termsite(&dir)
        .args(["render", missing.to_str().unwrap(), "--speed", "0"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error: Failed to load content."))
        .stderr(predicate::str::contains("Failed to load content from"));
}

#[test]
fn render_rejects_malformed_json() {
    let (dir, path) = temp_content("{ not json");
    termsite(&dir)
        .args(["render", path.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed to load content"));
}

#[test]
fn play_rejects_unknown_theme() {
    let (dir, path) = temp_content(SCENARIO);
    termsite(&dir)
        .args(["play", path.to_str().unwrap(), "--theme", "plaid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("plaid"));
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    let (stdout, _stderr, code) = run_termsite(&["--help"], dir.path());

    assert_eq!(code, 0);
    for sub in ["play", "render", "config", "completions"] {
        assert!(stdout.contains(sub), "help should mention {}", sub);
    }
}

#[test]
fn completions_for_bash() {
    let dir = TempDir::new().unwrap();
    termsite(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("termsite"));
}
