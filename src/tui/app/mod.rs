//! Interactive terminal front end.
//!
//! Draws the session's output container and feeds key presses back into
//! the session. Print tasks run on the same runtime as the event loop.

mod keys;
pub mod status_footer;

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use tracing::{debug, trace};

use super::crt::CrtEffect;
use super::theme::Theme;
use super::view::build_view;
use crate::document::{NodeId, Tag};
use crate::session::TerminalSession;

pub use keys::handle_key;

/// Redraw cadence while output is printing.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Result of processing an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
}

/// Front end state around a session.
pub struct SiteApp {
    session: TerminalSession,
    theme: Theme,
    crt: CrtEffect,
    focus: Option<NodeId>,
    /// First visible row
    scroll: usize,
    /// Keep the newest output in view
    follow: bool,
    /// Rows of the output area at the last draw
    viewport_rows: usize,
    last_revision: u64,
    needs_render: bool,
}

impl SiteApp {
    pub fn new(session: TerminalSession, theme: Theme, crt_effect: bool) -> Self {
        Self {
            session,
            theme,
            crt: CrtEffect::new(crt_effect, None, Instant::now()),
            focus: None,
            scroll: 0,
            follow: true,
            viewport_rows: 0,
            last_revision: u64::MAX,
            needs_render: true,
        }
    }

    pub fn session(&self) -> &TerminalSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TerminalSession {
        &mut self.session
    }

    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    /// Run until the user quits. Takes over the terminal for the duration.
    pub async fn run(mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal).await;
        ratatui::restore();
        result
    }

    async fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(FRAME_INTERVAL);

        loop {
            self.refresh();
            if self.needs_render {
                terminal.draw(|frame| self.draw(frame))?;
                self.needs_render = false;
            }

            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        trace!(?key, "key");
                        self.needs_render = true;
                        if handle_key(self, key) == InputResult::Quit {
                            debug!("quit requested");
                            return Ok(());
                        }
                    }
                    Some(Ok(Event::Resize(..))) => self.needs_render = true,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                },
                _ = tick.tick() => {
                    if self.crt.tick(Instant::now()) {
                        self.needs_render = true;
                    }
                }
            }
        }
    }

    /// Pick up document changes and drop focus from removed elements.
    fn refresh(&mut self) {
        let revision = self.session.surface().read(|doc| doc.revision());
        if revision == self.last_revision {
            return;
        }
        self.last_revision = revision;
        self.needs_render = true;

        if let Some(focus) = self.focus {
            if !self.session.interactive_nodes().contains(&focus) {
                self.focus = None;
                self.follow = true;
            }
        }
    }

    /// Move focus forward or backward through interactive elements, wrapping.
    pub fn move_focus(&mut self, forward: bool) {
        let nodes = self.session.interactive_nodes();
        if nodes.is_empty() {
            self.focus = None;
            return;
        }
        let current = self.focus.and_then(|f| nodes.iter().position(|&n| n == f));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => nodes.len() - 1,
            (Some(i), true) => (i + 1) % nodes.len(),
            (Some(i), false) => (i + nodes.len() - 1) % nodes.len(),
        };
        self.focus = Some(nodes[next]);
        self.follow = false;
    }

    /// Whether the focused element is a text input.
    pub fn input_focused(&self) -> bool {
        self.focus.is_some_and(|node| {
            self.session
                .surface()
                .read(|doc| doc.get(node).is_some_and(|el| el.tag == Tag::Input))
        })
    }

    /// Activate the focused element.
    pub fn activate_focus(&mut self) {
        if let Some(node) = self.focus {
            let outcome = self.session.activate(node);
            debug!(?outcome, "activated");
        }
    }

    /// Apply `edit` to the focused input's value.
    pub fn edit_input(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(node) = self.focus else {
            return;
        };
        let session = &self.session;
        let value = session
            .surface()
            .read(|doc| doc.get(node).map(|el| el.value.clone()));
        if let Some(mut value) = value {
            edit(&mut value);
            session.set_input_value(node, &value);
        }
    }

    pub fn scroll_by(&mut self, rows: isize) {
        self.scroll = self.scroll.saturating_add_signed(rows);
        self.follow = false;
    }

    pub fn page_rows(&self) -> usize {
        self.viewport_rows.max(1)
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let chunks = build_layout(frame.area());
        let output_area = chunks[0];
        self.viewport_rows = usize::from(output_area.height);

        let view = self.session.surface().read(|doc| {
            build_view(
                doc,
                self.session.surface().container(),
                self.focus,
                &self.theme,
                output_area.width,
            )
        });

        let max_scroll = view.lines.len().saturating_sub(self.viewport_rows);
        if self.follow {
            self.scroll = max_scroll;
        } else if let Some(row) = view.focus_row {
            // Keep the focused row on screen
            if row < self.scroll {
                self.scroll = row;
            } else if row >= self.scroll + self.viewport_rows {
                self.scroll = row + 1 - self.viewport_rows;
            }
        }
        self.scroll = self.scroll.min(max_scroll);
        if self.scroll == max_scroll && self.focus.is_none() {
            self.follow = true;
        }

        let mut style = self.theme.text_style();
        if self.crt.is_dim(Instant::now()) {
            style = style.add_modifier(Modifier::DIM);
        }
        let offset = u16::try_from(self.scroll).unwrap_or(u16::MAX);
        let output = Paragraph::new(view.lines).style(style).scroll((offset, 0));
        frame.render_widget(output, output_area);

        let status = status_footer::status_text(self.session.current_page(), self.session.sequencer().is_running());
        status_footer::render_status_line(frame, chunks[1], &status, &self.theme);
        let keys = if self.input_focused() {
            status_footer::INPUT_KEYS
        } else {
            status_footer::BROWSE_KEYS
        };
        status_footer::render_footer(frame, chunks[2], keys, &self.theme);
    }
}

/// Output area, status line, footer.
fn build_layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
        .split(area)
}
