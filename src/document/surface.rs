//! Shared handle to the rendering surface.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{Document, NodeId, Tag};
use crate::print::TextSink;

/// Cloneable handle to a document plus the container that output goes into.
///
/// The lock is only held for the duration of one closure, never across an
/// await point.
#[derive(Debug, Clone)]
pub struct Surface {
    doc: Arc<Mutex<Document>>,
    container: NodeId,
}

impl Surface {
    /// Wrap a document, printing into the element with `container_id`.
    ///
    /// Falls back to the body when no such element exists.
    pub fn new(doc: Document, container_id: &str) -> Self {
        let container = doc.find_by_id(container_id).unwrap_or_else(|| doc.body());
        Self {
            doc: Arc::new(Mutex::new(doc)),
            container,
        }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.doc.lock())
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.doc.lock())
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.read(|doc| doc.is_attached(node))
    }

    /// Create an element and append it to the container.
    pub fn append_to_container(&self, tag: Tag, class: &str) -> NodeId {
        self.append_new(self.container, tag, class)
    }

    /// Create an element with one class and append it to `parent`.
    pub fn append_new(&self, parent: NodeId, tag: Tag, class: &str) -> NodeId {
        self.write(|doc| {
            let node = doc.create(tag);
            add_classes(doc, node, class);
            doc.append(parent, node);
            node
        })
    }

    /// Create a detached element with one class.
    pub fn create(&self, tag: Tag, class: &str) -> NodeId {
        self.write(|doc| {
            let node = doc.create(tag);
            add_classes(doc, node, class);
            node
        })
    }

    /// Remove all output and everything that was created for it.
    pub fn clear(&self) {
        self.write(|doc| {
            doc.clear_children(self.container);
            doc.prune_detached();
        });
    }

    /// Replace the children of `node` with a single text block.
    pub fn replace_with_notice(&self, node: NodeId, class: &str, text: &str) -> Option<NodeId> {
        self.write(|doc| {
            if !doc.is_attached(node) {
                return None;
            }
            doc.clear_children(node);
            let notice = doc.create(Tag::Block);
            add_classes(doc, notice, class);
            doc.set_text(notice, text);
            doc.append(node, notice);
            Some(notice)
        })
    }

    /// Visible text of the container, one entry per line.
    pub fn text_lines(&self) -> Vec<String> {
        self.read(|doc| doc.text_lines(self.container))
    }
}

/// Space-separated class list, like a `className` assignment.
fn add_classes(doc: &mut Document, node: NodeId, classes: &str) {
    for class in classes.split_whitespace() {
        doc.add_class(node, class);
    }
}

/// Text sink writing into one document element.
#[derive(Debug, Clone)]
pub struct NodeSink {
    surface: Surface,
    node: NodeId,
}

impl NodeSink {
    pub fn new(surface: &Surface, node: NodeId) -> Self {
        Self {
            surface: surface.clone(),
            node,
        }
    }
}

impl TextSink for NodeSink {
    fn is_attached(&self) -> bool {
        self.surface.is_attached(self.node)
    }

    fn set_text(&mut self, text: &str) {
        self.surface.write(|doc| doc.set_text(self.node, text));
    }

    fn push_char(&mut self, ch: char) {
        self.surface.write(|doc| doc.push_char(self.node, ch));
    }
}
