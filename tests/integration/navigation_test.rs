//! Navigation between pages of a loaded site

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use termsite::document::{Bitmap, Interaction, NodeId};
use termsite::print::{decode_image, ImageError, ImageLoader};
use termsite::session::{Activation, NavState, NavigationOutcome, TerminalSession};
use termsite::{ContentSet, PrintTask};

use super::helpers::{fast_options, session, SCENARIO};

fn link_to(session: &TerminalSession, target: &str) -> Option<NodeId> {
    session.surface().read(|doc| {
        doc.interactive_nodes(session.surface().container())
            .into_iter()
            .find(|&n| {
                doc.get(n)
                    .is_some_and(|el| el.interaction == Some(Interaction::Navigate(target.to_string())))
            })
    })
}

fn back_links(session: &TerminalSession) -> usize {
    session
        .surface()
        .text_lines()
        .iter()
        .filter(|line| line.as_str() == "◃ Restart program")
        .count()
}

#[tokio::test(start_paused = true)]
async fn home_then_link_then_back() {
    let (mut session, opener) = session(SCENARIO);

    session.open_home();
    session.wait_idle().await;
    assert_eq!(session.surface().text_lines(), vec!["Welcome", "Hello", "▹ Go"]);

    let go = link_to(&session, "#other").expect("link to other");
    session.activate(go);
    session.wait_idle().await;
    assert_eq!(session.surface().text_lines(), vec!["Other", "Bye", "◃ Restart program"]);

    let back = link_to(&session, "#home").expect("back link");
    let outcome = session.activate(back);
    session.wait_idle().await;

    assert_eq!(outcome, Activation::Navigated(NavigationOutcome::Rendered("home".to_string())));
    assert_eq!(session.surface().text_lines(), vec!["Welcome", "Hello", "▹ Go"]);
    assert!(opener.opened().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unknown_page_appends_exactly_one_error() {
    let (mut session, _) = session(SCENARIO);
    session.open_home();
    session.wait_idle().await;

    assert_eq!(
        session.navigate(Some("#nowhere")),
        NavigationOutcome::NotFound("nowhere".to_string())
    );
    session.wait_idle().await;

    assert_eq!(
        session.surface().text_lines(),
        vec!["Welcome", "Hello", "▹ Go", "Error: page 'nowhere' not found."]
    );
    assert_eq!(session.current_page(), Some("home"));
}

#[tokio::test(start_paused = true)]
async fn queued_work_never_runs_after_navigation() {
    let (mut session, _) = session(SCENARIO);
    session.open_home();
    session.wait_idle().await;

    let container = session.surface().container();
    let hello = session
        .surface()
        .read(|doc| {
            doc.descendants(container)
                .into_iter()
                .find(|&n| doc.get(n).is_some_and(|el| el.text == "Hello"))
        })
        .expect("hello paragraph");

    let started = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicUsize::new(0));
    {
        let surface = session.surface().clone();
        let (started, finished) = (started.clone(), finished.clone());
        session.sequencer().enqueue(PrintTask::new("in-flight", async move {
            started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            // Target belongs to the old page
            surface.write(|doc| doc.set_text(hello, "stale"));
            finished.fetch_add(1, Ordering::SeqCst);
        }));
    }
    let ran = Arc::new(AtomicUsize::new(0));
    for _ in 0..3 {
        let ran = ran.clone();
        session.sequencer().enqueue(PrintTask::new("queued", async move {
            ran.fetch_add(1, Ordering::SeqCst);
        }));
    }

    session.sequencer().start();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(finished.load(Ordering::SeqCst), 0);
    assert_eq!(session.sequencer().pending(), 3);

    session.navigate(Some("#other"));
    session.wait_idle().await;

    assert_eq!(finished.load(Ordering::SeqCst), 1);
    assert_eq!(ran.load(Ordering::SeqCst), 0);
    assert_eq!(session.surface().text_lines(), vec!["Other", "Bye", "◃ Restart program"]);
    assert_eq!(session.state(), NavState::Idle);
}

/// Serves three rows of text art for any source.
struct TextArt;

#[async_trait]
impl ImageLoader for TextArt {
    async fn load(&self, src: &str) -> Result<Bitmap, ImageError> {
        decode_image(b"abc\ndef\nghi").map_err(|reason| ImageError::Decode {
            src: src.to_string(),
            reason,
        })
    }
}

#[tokio::test(start_paused = true)]
async fn image_reveal_interrupted_by_navigation_leaves_new_page_clean() {
    let mut options = fast_options();
    options.reveal.bands = 3;
    options.reveal.band_delay = Duration::from_millis(50);
    let mut session = TerminalSession::new(options).with_image_loader(Arc::new(TextArt));
    session.set_content(
        ContentSet::from_json(
            r##"{
                "home": {"title": "Art", "content": [{"type": "image", "content": "art.txt"}, "After"]},
                "other": {"title": "Other", "content": ["Bye"]}
            }"##,
        )
        .expect("valid content"),
    );

    session.open_home();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let partial = session.surface().text_lines();
    assert!(partial.iter().any(|line| line == "abc"));
    assert!(!partial.iter().any(|line| line == "def" || line == "After"));

    session.navigate(Some("#other"));
    session.wait_idle().await;

    assert_eq!(session.surface().text_lines(), vec!["Other", "Bye", "◃ Restart program"]);
}

#[tokio::test(start_paused = true)]
async fn every_page_but_home_has_one_back_link() {
    let (mut session, _) = session(SCENARIO);

    session.open_home();
    session.wait_idle().await;
    assert_eq!(back_links(&session), 0);

    for _ in 0..3 {
        session.navigate(Some("#other"));
        session.wait_idle().await;
        assert_eq!(back_links(&session), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn rapid_navigation_shows_only_the_last_page() {
    let (mut session, _) = session(SCENARIO);
    session.open_home();
    tokio::time::sleep(Duration::from_millis(12)).await;
    session.navigate(Some("#other"));
    session.navigate(Some("#home"));
    session.navigate(Some("#other"));
    session.wait_idle().await;

    assert_eq!(session.surface().text_lines(), vec!["Other", "Bye", "◃ Restart program"]);
}

#[tokio::test(start_paused = true)]
async fn external_links_leave_the_page_alone() {
    let (mut session, opener) = session(
        r##"{"home": {"title": "Home", "content": [{"type": "link", "content": "Site", "url": "https://example.com"}]}}"##,
    );
    session.open_home();
    session.wait_idle().await;

    let link = link_to(&session, "https://example.com").expect("external link");
    let outcome = session.activate(link);

    assert_eq!(
        outcome,
        Activation::Navigated(NavigationOutcome::Opened("https://example.com".to_string()))
    );
    assert_eq!(opener.opened(), vec!["https://example.com".to_string()]);
    assert_eq!(session.surface().text_lines(), vec!["Home", "▹▹ Site"]);
}
