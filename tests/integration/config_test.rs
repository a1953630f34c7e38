//! Config file handling through the CLI

use std::fs;

use tempfile::TempDir;
use termsite::config::migrate_config;
use termsite::Config;

use super::helpers::{run_termsite, temp_content, SCENARIO};

fn config_file(home: &TempDir) -> std::path::PathBuf {
    home.path().join(".config").join("termsite").join("config.toml")
}

#[test]
fn show_prints_defaults_without_a_file() {
    let home = TempDir::new().unwrap();
    let (stdout, _stderr, code) = run_termsite(&["config", "show"], home.path());

    assert_eq!(code, 0);
    assert!(stdout.contains("[playback]"));
    assert!(stdout.contains("print_speed_ms = 5"));
    assert!(stdout.contains("[display]"));
    assert!(!config_file(&home).exists());
}

#[test]
fn migrate_creates_missing_file() {
    let home = TempDir::new().unwrap();
    let (stdout, _stderr, code) = run_termsite(&["config", "migrate", "--yes"], home.path());

    assert_eq!(code, 0);
    assert!(stdout.contains("Config updated successfully."));
    let written = fs::read_to_string(config_file(&home)).unwrap();
    assert_eq!(Config::from_toml(&written).unwrap(), Config::default());
}

#[test]
fn migrate_keeps_user_values() {
    let home = TempDir::new().unwrap();
    let path = config_file(&home);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "# mine\n[playback]\nprint_speed_ms = 40\n").unwrap();

    let (_stdout, _stderr, code) = run_termsite(&["config", "migrate", "--yes"], home.path());
    assert_eq!(code, 0);

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("# mine"));
    assert!(written.contains("print_speed_ms = 40"));
    assert!(written.contains("[display]"));
    assert!(!migrate_config(&written).unwrap().has_changes());
}

#[test]
fn migrate_without_yes_is_a_noop_when_not_interactive() {
    let home = TempDir::new().unwrap();
    let (stdout, _stderr, code) = run_termsite(&["config", "migrate"], home.path());

    assert_eq!(code, 0);
    assert!(stdout.contains("No changes made."));
    assert!(!config_file(&home).exists());
}

#[test]
fn invalid_config_stops_render() {
    let (home, content) = temp_content(SCENARIO);
    let path = config_file(&home);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "[playback]\nstall_probability = 1.5\n").unwrap();

    let (stdout, stderr, code) = run_termsite(&["render", content.to_str().unwrap()], home.path());

    assert_ne!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("stall_probability"));
}
