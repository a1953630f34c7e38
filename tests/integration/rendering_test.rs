//! Rendering of every item kind from a content file on disk

use std::time::Duration;

use termsite::session::{Activation, TerminalSession};

use super::helpers::{fast_options, temp_content, write_file};

const SITE: &str = r##"{
    "home": {"title": "Gallery", "content": [
        {"type": "image", "content": "art.txt"},
        {"type": "image", "content": "missing.txt"},
        {"type": "selection", "content": "Pick", "options": [
            {"content": "One", "url": "#one"},
            {"content": "Two", "url": "#two"}
        ]},
        {"type": "input", "content": "Name", "id": "name"},
        {"type": "button", "content": "Send", "action": "show-inputs"}
    ]}
}"##;

async fn loaded(json: &str) -> (tempfile::TempDir, TerminalSession) {
    let (dir, path) = temp_content(json);
    write_file(dir.path(), "art.txt", b"/\\\n\\/\n");
    let mut session = TerminalSession::new(fast_options());
    assert!(session.load_content(&path).await);
    (dir, session)
}

#[tokio::test]
async fn renders_images_selections_inputs_and_buttons() {
    let (_dir, mut session) = loaded(SITE).await;
    session.open_home();
    tokio::time::timeout(Duration::from_secs(10), session.wait_idle())
        .await
        .expect("page finished printing");

    assert_eq!(
        session.surface().text_lines(),
        vec![
            "Gallery",
            "/\\",
            "\\/",
            "Error loading image: missing.txt",
            "Pick",
            "1. One",
            "2. Two",
            "Name:[]",
            "Send",
        ]
    );
}

#[tokio::test]
async fn button_action_reads_inputs() {
    let (_dir, mut session) = loaded(SITE).await;
    session.open_home();
    tokio::time::timeout(Duration::from_secs(10), session.wait_idle())
        .await
        .expect("page finished printing");

    let nodes = session.interactive_nodes();
    let input = session
        .surface()
        .read(|doc| doc.find_by_id("name"))
        .expect("input rendered");
    assert!(session.set_input_value(input, "Ada"));

    let button = *nodes.last().expect("button rendered");
    assert_eq!(session.activate(button), Activation::RanAction("show-inputs".to_string()));
    tokio::time::timeout(Duration::from_secs(10), session.wait_idle())
        .await
        .expect("output printed");

    assert_eq!(session.input_value("name").as_deref(), Some("Ada"));
    assert_eq!(session.surface().text_lines().last().map(String::as_str), Some("name: Ada"));
}

#[tokio::test]
async fn unreadable_content_prints_notice() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut session = TerminalSession::new(fast_options());

    assert!(!session.load_content(&dir.path().join("absent.json")).await);
    session.wait_idle().await;
    assert_eq!(
        session.surface().text_lines(),
        vec!["Error: Failed to load content. Please check the log for details."]
    );
    assert_eq!(session.navigate(Some("#home")), termsite::NavigationOutcome::Ignored);
}
