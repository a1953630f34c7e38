//! In-memory element tree that the print pipeline writes into.
//!
//! The document plays the role of the browser DOM: elements have a tag,
//! optional id, class tags, text and children. Only elements reachable from
//! the body are *attached*; the front end draws attached elements and the
//! print pipeline stops touching elements that are no longer attached.
//!
//! Removed elements are dropped from the tree entirely, so writes through a
//! stale [`NodeId`] are silent no-ops.

mod canvas;
mod layout;
mod surface;

use std::collections::{HashMap, HashSet};

pub use canvas::{Bitmap, Canvas, Pixel, Rgb};
pub use layout::{Fragment, LayoutLine};
pub use surface::{NodeSink, Surface};

/// Handle to an element. Never reused within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Element tags.
///
/// Block tags start a new line when laid out, inline tags continue the
/// current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Body,
    /// Generic block container (`div`)
    Block,
    Paragraph,
    /// Inline text (`span`)
    Span,
    Anchor,
    Input,
    Button,
    Canvas,
}

impl Tag {
    pub fn is_block(&self) -> bool {
        matches!(self, Tag::Body | Tag::Block | Tag::Paragraph | Tag::Canvas)
    }
}

/// What happens when an element is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Navigate to a page reference or open an external URL
    Navigate(String),
    /// Run a registered action by name
    Action(String),
}

/// A single element.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: Tag,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: String,
    /// Current value of an input element
    pub value: String,
    pub interaction: Option<Interaction>,
    pub canvas: Option<Canvas>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            text: String::new(),
            value: String::new(),
            interaction: None,
            canvas: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Whether the element can receive focus in the front end.
    pub fn is_interactive(&self) -> bool {
        self.interaction.is_some() || self.tag == Tag::Input
    }
}

/// The element tree.
#[derive(Debug)]
pub struct Document {
    nodes: HashMap<NodeId, Element>,
    next_id: u64,
    body: NodeId,
    /// Bumped on every mutation; lets the front end skip redundant redraws
    revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only the body.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: HashMap::new(),
            next_id: 0,
            body: NodeId(0),
            revision: 0,
        };
        doc.body = doc.create(Tag::Body);
        doc
    }

    /// Create a document whose body holds one block with the given id.
    pub fn with_container(container_id: &str) -> Self {
        let mut doc = Self::new();
        let container = doc.create(Tag::Block);
        doc.set_id(container, container_id);
        doc.append(doc.body, container);
        doc
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Create a detached element.
    pub fn create(&mut self, tag: Tag) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Element::new(tag));
        self.revision += 1;
        id
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(&node)
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.revision += 1;
        self.nodes.get_mut(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Returns false if either element no longer exists, or if `child` already
    /// has a parent.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.contains(parent) {
            return false;
        }
        match self.nodes.get(&child) {
            Some(el) if el.parent.is_none() && child != self.body => {}
            _ => return false,
        }
        if let Some(el) = self.get_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.get_mut(parent) {
            el.children.push(child);
        }
        true
    }

    /// Whether the element is reachable from the body.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.body {
                return true;
            }
            match self.nodes.get(&current).and_then(|el| el.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Remove all children of `node` (and their subtrees) from the document.
    pub fn clear_children(&mut self, node: NodeId) {
        let children = match self.get_mut(node) {
            Some(el) => std::mem::take(&mut el.children),
            None => return,
        };
        let mut stack = children;
        while let Some(id) = stack.pop() {
            if let Some(el) = self.nodes.remove(&id) {
                stack.extend(el.children);
            }
        }
    }

    /// Drop every element that is not attached.
    ///
    /// Elements created ahead of time for print tasks that were discarded
    /// would otherwise live forever.
    pub fn prune_detached(&mut self) {
        let attached: HashSet<NodeId> = self
            .nodes
            .keys()
            .copied()
            .filter(|&id| self.is_attached(id))
            .collect();
        self.nodes.retain(|id, _| attached.contains(id));
        self.revision += 1;
    }

    /// Set the text of an element. Returns false if it no longer exists.
    pub fn set_text(&mut self, node: NodeId, text: &str) -> bool {
        match self.get_mut(node) {
            Some(el) => {
                el.text.clear();
                el.text.push_str(text);
                true
            }
            None => false,
        }
    }

    /// Append one character to an element's text.
    pub fn push_char(&mut self, node: NodeId, ch: char) -> bool {
        match self.get_mut(node) {
            Some(el) => {
                el.text.push(ch);
                true
            }
            None => false,
        }
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) -> bool {
        match self.get_mut(node) {
            Some(el) if el.tag == Tag::Input => {
                el.value = value.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        if let Some(el) = self.get_mut(node) {
            el.id = Some(id.to_string());
        }
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.get_mut(node) {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn set_interaction(&mut self, node: NodeId, interaction: Interaction) {
        if let Some(el) = self.get_mut(node) {
            el.interaction = Some(interaction);
        }
    }

    pub fn set_canvas(&mut self, node: NodeId, canvas: Canvas) {
        if let Some(el) = self.get_mut(node) {
            el.canvas = Some(canvas);
        }
    }

    /// Paint rows of a bitmap onto a canvas element.
    pub fn paint_canvas(&mut self, node: NodeId, bitmap: &Bitmap, rows: std::ops::Range<usize>) -> bool {
        match self.get_mut(node).and_then(|el| el.canvas.as_mut()) {
            Some(canvas) => {
                canvas.paint_rows(bitmap, rows);
                true
            }
            None => false,
        }
    }

    /// Find an element by id, attached or not.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, el)| el.id.as_deref() == Some(id))
            .map(|(node, _)| *node)
            .min()
    }

    /// Attached descendants of `root` in document order (root excluded).
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.get(root) {
            Some(el) => el.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(id) = stack.pop() {
            if let Some(el) = self.get(id) {
                out.push(id);
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    /// Attached interactive elements under `root`, in document order.
    pub fn interactive_nodes(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(Element::is_interactive))
            .collect()
    }

    /// Visible text under `root`, one string per laid out line.
    pub fn text_lines(&self, root: NodeId) -> Vec<String> {
        self.layout(root).iter().map(LayoutLine::plain_text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_container_attaches_container() {
        let doc = Document::with_container("terminal");
        let container = doc.find_by_id("terminal").unwrap();
        assert!(doc.is_attached(container));
        assert_eq!(doc.get(doc.body()).unwrap().children(), &[container]);
    }

    #[test]
    fn created_nodes_start_detached() {
        let mut doc = Document::new();
        let p = doc.create(Tag::Paragraph);
        assert!(!doc.is_attached(p));
        assert!(doc.append(doc.body(), p));
        assert!(doc.is_attached(p));
    }

    #[test]
    fn append_rejects_second_parent() {
        let mut doc = Document::new();
        let a = doc.create(Tag::Block);
        let b = doc.create(Tag::Block);
        let child = doc.create(Tag::Span);
        assert!(doc.append(a, child));
        assert!(!doc.append(b, child));
        assert!(!doc.append(child, child));
    }

    #[test]
    fn clear_children_removes_subtree() {
        let mut doc = Document::with_container("terminal");
        let container = doc.find_by_id("terminal").unwrap();
        let div = doc.create(Tag::Block);
        let span = doc.create(Tag::Span);
        doc.append(container, div);
        doc.append(div, span);

        doc.clear_children(container);

        assert!(!doc.contains(div));
        assert!(!doc.contains(span));
        assert!(!doc.is_attached(span));
        assert!(!doc.set_text(span, "late write"));
        assert!(doc.contains(container));
    }

    #[test]
    fn prune_drops_orphans() {
        let mut doc = Document::new();
        let orphan = doc.create(Tag::Anchor);
        doc.prune_detached();
        assert!(!doc.contains(orphan));
        assert!(doc.contains(doc.body()));
    }

    #[test]
    fn push_char_appends() {
        let mut doc = Document::new();
        let p = doc.create(Tag::Paragraph);
        doc.set_text(p, "ab");
        doc.push_char(p, 'c');
        assert_eq!(doc.get(p).unwrap().text, "abc");
    }

    #[test]
    fn set_value_only_applies_to_inputs() {
        let mut doc = Document::new();
        let input = doc.create(Tag::Input);
        let p = doc.create(Tag::Paragraph);
        assert!(doc.set_value(input, "Ada"));
        assert!(!doc.set_value(p, "Ada"));
        assert_eq!(doc.get(input).unwrap().value, "Ada");
    }

    #[test]
    fn add_class_is_idempotent() {
        let mut doc = Document::new();
        let p = doc.create(Tag::Paragraph);
        doc.add_class(p, "x");
        doc.add_class(p, "x");
        assert_eq!(doc.get(p).unwrap().classes, vec!["x"]);
    }

    #[test]
    fn interactive_nodes_in_document_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let first = doc.create(Tag::Anchor);
        let block = doc.create(Tag::Block);
        let input = doc.create(Tag::Input);
        let button = doc.create(Tag::Button);
        doc.set_interaction(first, Interaction::Navigate("#a".into()));
        doc.set_interaction(button, Interaction::Action("go".into()));
        doc.append(body, first);
        doc.append(body, block);
        doc.append(block, input);
        doc.append(body, button);

        assert_eq!(doc.interactive_nodes(body), vec![first, input, button]);
    }

    #[test]
    fn revision_changes_on_mutation() {
        let mut doc = Document::new();
        let before = doc.revision();
        let p = doc.create(Tag::Paragraph);
        doc.push_char(p, 'x');
        assert!(doc.revision() > before);
    }
}
