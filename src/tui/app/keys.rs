//! Keyboard handling for the site app.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{InputResult, SiteApp};

/// Handle one key press.
///
/// Printable keys go to a focused input; otherwise `q` quits.
pub fn handle_key(app: &mut SiteApp, key: KeyEvent) -> InputResult {
    let editing = app.input_focused();

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputResult::Quit,
        KeyCode::Esc => InputResult::Quit,

        // === Focus ===
        KeyCode::Tab | KeyCode::Down => {
            app.move_focus(true);
            InputResult::Continue
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.move_focus(false);
            InputResult::Continue
        }
        KeyCode::Enter => {
            app.activate_focus();
            InputResult::Continue
        }

        // === Scrolling ===
        KeyCode::PageUp => {
            let rows = app.page_rows() as isize;
            app.scroll_by(-rows);
            InputResult::Continue
        }
        KeyCode::PageDown => {
            let rows = app.page_rows() as isize;
            app.scroll_by(rows);
            InputResult::Continue
        }

        // === Input editing ===
        KeyCode::Backspace if editing => {
            app.edit_input(|value| {
                value.pop();
            });
            InputResult::Continue
        }
        KeyCode::Char(ch) if editing => {
            app.edit_input(|value| value.push(ch));
            InputResult::Continue
        }

        KeyCode::Char('q') => InputResult::Quit,
        _ => InputResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSet;
    use crate::session::{SessionOptions, TerminalSession};
    use crate::tui::theme::Theme;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn form_app() -> SiteApp {
        let json = r#"{"home": {"title": "Form", "content": [
            {"type": "input", "content": "Name", "id": "name"},
            {"type": "button", "content": "Send", "action": "show-inputs"}
        ]}}"#;
        let mut session = TerminalSession::new(SessionOptions::default());
        session.set_content(ContentSet::from_json(json).unwrap());
        session.open_home();
        session.wait_idle().await;
        SiteApp::new(session, Theme::default(), false)
    }

    #[tokio::test(start_paused = true)]
    async fn quit_keys() {
        let mut app = form_app().await;
        assert_eq!(handle_key(&mut app, press(KeyCode::Esc)), InputResult::Quit);
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('q'))), InputResult::Quit);
        assert_eq!(
            handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            InputResult::Quit
        );
    }

    #[tokio::test(start_paused = true)]
    async fn typing_goes_into_focused_input() {
        let mut app = form_app().await;
        handle_key(&mut app, press(KeyCode::Tab));
        for ch in "qx".chars() {
            assert_eq!(handle_key(&mut app, press(KeyCode::Char(ch))), InputResult::Continue);
        }
        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.session().input_value("name").as_deref(), Some("q"));
    }

    #[tokio::test(start_paused = true)]
    async fn enter_runs_button_action() {
        let mut app = form_app().await;
        handle_key(&mut app, press(KeyCode::Tab));
        handle_key(&mut app, press(KeyCode::Char('A')));
        handle_key(&mut app, press(KeyCode::Tab));
        handle_key(&mut app, press(KeyCode::Enter));
        app.session().wait_idle().await;

        let lines = app.session().surface().text_lines();
        assert_eq!(lines.last().map(String::as_str), Some("name: A"));
    }
}
