//! Turning the document into ratatui lines.
//!
//! The view does its own wrapping so the app knows which screen row the
//! focused element lands on.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

use super::theme::Theme;
use crate::document::{Document, Fragment, NodeId};

/// Wrapped output ready to draw.
#[derive(Debug, Default)]
pub struct PageView {
    pub lines: Vec<Line<'static>>,
    /// First row showing the focused element
    pub focus_row: Option<usize>,
}

/// Lay out `root` and wrap it to `width` columns.
pub fn build_view(doc: &Document, root: NodeId, focus: Option<NodeId>, theme: &Theme, width: u16) -> PageView {
    let width = usize::from(width.max(1));
    let mut view = PageView::default();

    for line in doc.layout(root) {
        let mut cells: Vec<(char, Style)> = Vec::new();
        let mut focus_col = None;
        for fragment in &line.fragments {
            let focused = focus == Some(fragment.node());
            if focused {
                focus_col = Some(cells.len());
            }
            push_fragment(doc, fragment, focused, theme, &mut cells);
        }

        let first_row = view.lines.len();
        let rows = wrap_cells(&cells, width);
        if let Some(col) = focus_col {
            view.focus_row = Some(first_row + row_of_cell(&rows, col));
        }
        view.lines.extend(rows.into_iter().map(|row| to_line(&row)));
    }
    view
}

fn push_fragment(doc: &Document, fragment: &Fragment, focused: bool, theme: &Theme, out: &mut Vec<(char, Style)>) {
    let node = fragment.node();
    let mut style = element_style(doc, node, theme);
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }

    match fragment {
        Fragment::Text { text, .. } => out.extend(text.chars().map(|ch| (ch, style))),
        Fragment::Input { value, .. } => {
            out.push(('[', style));
            out.extend(value.chars().map(|ch| (ch, style)));
            if focused {
                out.push(('_', style.add_modifier(Modifier::SLOW_BLINK)));
            }
            out.push((']', style));
        }
        Fragment::Pixels { row, .. } => {
            for pixel in row {
                match pixel {
                    Some(p) => {
                        let fg = p.color.map_or(theme.text_primary, |c| Color::Rgb(c.0, c.1, c.2));
                        out.push((p.ch, Style::default().fg(fg)));
                    }
                    None => out.push((' ', Style::default())),
                }
            }
        }
    }
}

/// Style from the element's own classes and its parent's.
fn element_style(doc: &Document, node: NodeId, theme: &Theme) -> Style {
    let Some(el) = doc.get(node) else {
        return theme.class_style([]);
    };
    let parent_classes = el
        .parent()
        .and_then(|p| doc.get(p))
        .map(|p| p.classes.as_slice())
        .unwrap_or_default();
    theme.class_style(
        parent_classes
            .iter()
            .chain(el.classes.iter())
            .map(String::as_str),
    )
}

/// Split cells into rows of at most `width` columns.
fn wrap_cells(cells: &[(char, Style)], width: usize) -> Vec<Vec<(char, Style)>> {
    let mut rows = vec![Vec::new()];
    let mut used = 0;
    for &(ch, style) in cells {
        let w = ch.width().unwrap_or(0);
        if used + w > width && used > 0 {
            rows.push(Vec::new());
            used = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push((ch, style));
        }
        used += w;
    }
    rows
}

fn row_of_cell(rows: &[Vec<(char, Style)>], index: usize) -> usize {
    let mut seen = 0;
    for (i, row) in rows.iter().enumerate() {
        seen += row.len();
        if index < seen {
            return i;
        }
    }
    rows.len().saturating_sub(1)
}

/// Merge runs of equally styled cells into spans.
fn to_line(cells: &[(char, Style)]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut text = String::new();
    let mut current: Option<Style> = None;
    for &(ch, style) in cells {
        if current.is_some_and(|s| s != style) {
            spans.push(Span::styled(std::mem::take(&mut text), current.unwrap_or_default()));
        }
        current = Some(style);
        text.push(ch);
    }
    if let Some(style) = current {
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}
