//! Status line and footer rendering
//!
//! The status bar names the current page and shows when output is still
//! printing; the footer lists key hints.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme::Theme;

/// Key hints while no input has focus.
pub const BROWSE_KEYS: &[(&str, &str)] = &[
    ("Tab/\u{2193}", "next"),
    ("S-Tab/\u{2191}", "prev"),
    ("Enter", "open"),
    ("PgUp/PgDn", "scroll"),
    ("q", "quit"),
];

/// Key hints while an input has focus.
pub const INPUT_KEYS: &[(&str, &str)] = &[
    ("type", "edit"),
    ("Backspace", "delete"),
    ("Tab", "leave"),
    ("Esc", "quit"),
];

/// Status text for the current page.
pub fn status_text(page: Option<&str>, printing: bool) -> String {
    let page = page.unwrap_or("-");
    if printing {
        format!("page: {} | printing...", page)
    } else {
        format!("page: {}", page)
    }
}

pub fn render_status_line(frame: &mut Frame, area: Rect, text: &str, theme: &Theme) {
    let status = Paragraph::new(text.to_string()).style(Style::default().fg(theme.text_secondary));
    frame.render_widget(status, area);
}

/// Render a centered footer with keybinding hints.
///
/// Example: `&[("q", "quit"), ("Enter", "open")]` renders as `"q: quit | Enter: open"`.
pub fn render_footer(frame: &mut Frame, area: Rect, keys: &[(&str, &str)], theme: &Theme) {
    let footer = Paragraph::new(Line::from(build_footer_spans(keys, theme)))
        .style(Style::default().fg(theme.text_secondary))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

/// Keys in the accent color, descriptions secondary, joined by " | ".
fn build_footer_spans(keys: &[(&str, &str)], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(keys.len() * 3);
    for (i, (key, desc)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                " | ".to_string(),
                Style::default().fg(theme.text_secondary),
            ));
        }
        spans.push(Span::styled(key.to_string(), Style::default().fg(theme.accent)));
        spans.push(Span::styled(
            format!(": {}", desc),
            Style::default().fg(theme.text_secondary),
        ));
    }
    spans
}
