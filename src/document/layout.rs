//! Line layout of attached elements.
//!
//! Block elements start and end lines, inline elements continue the current
//! line, and canvases contribute one line per pixel row.

use super::{Document, NodeId, Pixel, Tag};

/// A piece of a laid out line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text { node: NodeId, text: String },
    Input { node: NodeId, value: String },
    Pixels { node: NodeId, row: Vec<Option<Pixel>> },
}

impl Fragment {
    pub fn node(&self) -> NodeId {
        match self {
            Fragment::Text { node, .. }
            | Fragment::Input { node, .. }
            | Fragment::Pixels { node, .. } => *node,
        }
    }
}

/// One line of output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutLine {
    pub fragments: Vec<Fragment>,
}

impl LayoutLine {
    /// Line as plain text. Inputs show as `[value]`, unpainted pixels as spaces.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text { text, .. } => out.push_str(text),
                Fragment::Input { value, .. } => {
                    out.push('[');
                    out.push_str(value);
                    out.push(']');
                }
                Fragment::Pixels { row, .. } => {
                    let pixels: String = row.iter().map(|px| px.map_or(' ', |p| p.ch)).collect();
                    out.push_str(pixels.trim_end());
                }
            }
        }
        out
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.fragments.iter().any(|f| f.node() == node)
    }
}

impl Document {
    /// Lay out the attached subtree under `root`.
    pub fn layout(&self, root: NodeId) -> Vec<LayoutLine> {
        let mut lines = Vec::new();
        let mut current = LayoutLine::default();
        if let Some(el) = self.get(root) {
            for &child in el.children() {
                self.layout_node(child, &mut current, &mut lines);
            }
        }
        flush(&mut current, &mut lines);
        lines
    }

    fn layout_node(&self, node: NodeId, current: &mut LayoutLine, lines: &mut Vec<LayoutLine>) {
        let Some(el) = self.get(node) else {
            return;
        };

        if el.tag.is_block() {
            flush(current, lines);
        }

        match el.tag {
            Tag::Canvas => {
                if let Some(canvas) = &el.canvas {
                    for y in 0..canvas.height() {
                        if let Some(row) = canvas.row(y) {
                            lines.push(LayoutLine {
                                fragments: vec![Fragment::Pixels {
                                    node,
                                    row: row.to_vec(),
                                }],
                            });
                        }
                    }
                }
            }
            Tag::Input => current.fragments.push(Fragment::Input {
                node,
                value: el.value.clone(),
            }),
            _ if !el.text.is_empty() => current.fragments.push(Fragment::Text {
                node,
                text: el.text.clone(),
            }),
            _ => {}
        }

        for &child in el.children() {
            self.layout_node(child, current, lines);
        }

        if el.tag.is_block() {
            flush(current, lines);
        }
    }
}

fn flush(current: &mut LayoutLine, lines: &mut Vec<LayoutLine>) {
    if !current.fragments.is_empty() {
        lines.push(std::mem::take(current));
    }
}
