//! Shared fixtures for integration tests

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tempfile::TempDir;
use termsite::{ContentSet, RecordingOpener, SessionOptions, TerminalSession};

/// The two-page site used throughout the tests.
pub const SCENARIO: &str = r##"{
    "home": {"title": "Welcome", "content": ["Hello", {"type": "link", "content": "Go", "url": "#other"}]},
    "other": {"title": "Other", "content": ["Bye"]}
}"##;

/// Write `json` to `content.json` in a fresh temp dir.
pub fn temp_content(json: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("content.json");
    std::fs::write(&path, json).expect("write content");
    (dir, path)
}

/// Write an extra file next to the content.
pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).expect("write fixture");
    path
}

/// Fast session options: instant typing, no stalls.
pub fn fast_options() -> SessionOptions {
    let mut options = SessionOptions::default();
    options.print_interval = std::time::Duration::from_millis(1);
    options.reveal.stall_probability = 0.0;
    options.seed = Some(7);
    options
}

/// Session over parsed `json` with a recording opener.
pub fn session(json: &str) -> (TerminalSession, Arc<RecordingOpener>) {
    let opener = Arc::new(RecordingOpener::new());
    let mut session = TerminalSession::new(fast_options()).with_opener(opener.clone());
    session.set_content(ContentSet::from_json(json).expect("valid content"));
    (session, opener)
}

/// Run the termsite binary with an isolated config dir.
pub fn run_termsite(args: &[&str], home: &Path) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_termsite"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("TERMSITE_LOG")
        .output()
        .expect("Failed to execute termsite");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}
