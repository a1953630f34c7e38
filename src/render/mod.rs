//! Content item renderer.
//!
//! Turns content items into document elements. Placeholders are created and
//! appended right away so the output keeps content order; the visible reveal
//! is queued as one print task per item.

mod ids;

use std::sync::Arc;

use tracing::trace;

use crate::content::{ContentItem, ItemKind, NavDirection, PageRef, SelectOption};
use crate::document::{Interaction, NodeId, NodeSink, Surface, Tag};
use crate::print::{CancellationToken, ImageRevealer, PrintTask, Reveal, Sequencer, Typewriter};

pub use ids::{generate_id, is_generated, AUTO_ID_PREFIX};

/// Glyph before internal links that lead back.
pub const BACK_PREFIX: &str = "◃ ";
/// Glyph before internal links that lead forward.
pub const FORWARD_PREFIX: &str = "▹ ";
/// Glyph before external links.
pub const EXTERNAL_PREFIX: &str = "▹▹ ";

/// Elements created for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedItem {
    /// Element that received the class tags
    pub primary: NodeId,
    /// Element that received the id
    pub target: NodeId,
}

/// Renders items of one page into a surface.
///
/// All tasks it queues share the render's cancellation token.
#[derive(Debug, Clone)]
pub struct ContentRenderer {
    surface: Surface,
    sequencer: Sequencer,
    typewriter: Typewriter,
    revealer: Arc<ImageRevealer>,
    cancel: CancellationToken,
}

impl ContentRenderer {
    pub fn new(
        surface: Surface,
        sequencer: Sequencer,
        typewriter: Typewriter,
        revealer: Arc<ImageRevealer>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            surface,
            sequencer,
            typewriter,
            revealer,
            cancel,
        }
    }

    /// Queue a paragraph with the given classes.
    pub fn render_paragraph(&self, class: &str, text: &str) -> NodeId {
        let paragraph = self.surface.append_to_container(Tag::Paragraph, class);
        self.queue_typing("paragraph", paragraph, text.to_string());
        paragraph
    }

    /// Queue a page title.
    pub fn render_title(&self, title: &str) -> NodeId {
        self.render_paragraph("terminal-title", title)
    }

    /// Create the placeholders for `item` and queue its reveal.
    pub fn render_item(&self, item: &ContentItem) -> RenderedItem {
        trace!(kind = item.kind_name(), "rendering item");
        let rendered = match &item.kind {
            ItemKind::Text => {
                let node = self.render_paragraph("terminal-text", &item.content);
                RenderedItem {
                    primary: node,
                    target: node,
                }
            }
            ItemKind::Image => self.render_image(&item.content),
            ItemKind::Link { url, direction } => self.render_link(&item.content, url.as_deref(), *direction),
            ItemKind::Selection { options, bullet } => {
                self.render_selection(&item.content, options, bullet.as_deref())
            }
            ItemKind::Input => self.render_input(&item.content),
            ItemKind::Button { action } => self.render_button(&item.content, action.as_deref()),
        };

        self.surface.write(|doc| {
            for class in &item.classes {
                doc.add_class(rendered.primary, class);
            }
            let id = match &item.id {
                Some(id) => id.clone(),
                None => generate_id(doc),
            };
            doc.set_id(rendered.target, &id);
        });
        rendered
    }

    fn render_image(&self, src: &str) -> RenderedItem {
        let container = self.surface.append_to_container(Tag::Block, "image-container");
        let surface = self.surface.clone();
        let revealer = self.revealer.clone();
        let cancel = self.cancel.clone();
        let src = src.to_string();
        self.sequencer.enqueue(PrintTask::new("image", async move {
            revealer.reveal(&surface, container, &src, &cancel).await;
        }));
        RenderedItem {
            primary: container,
            target: container,
        }
    }

    fn render_link(&self, label: &str, url: Option<&str>, direction: NavDirection) -> RenderedItem {
        let container = self.surface.append_to_container(Tag::Block, "link-container");
        let anchor = self.surface.create(Tag::Anchor, "terminal-link");
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.surface
                .write(|doc| doc.set_interaction(anchor, Interaction::Navigate(url.to_string())));
        }

        let text = format!("{}{}", link_prefix(url, direction), label);
        self.queue_attach_and_type("link", container, anchor, text);
        RenderedItem {
            primary: container,
            target: anchor,
        }
    }

    fn render_selection(&self, label: &str, options: &[SelectOption], bullet: Option<&str>) -> RenderedItem {
        let container = self.surface.append_to_container(Tag::Block, "select-container");
        let surface = self.surface.clone();
        let typewriter = self.typewriter;
        let cancel = self.cancel.clone();
        let label = label.to_string();
        let entries: Vec<(String, String)> = options
            .iter()
            .enumerate()
            .map(|(index, option)| (option_text(index, option, bullet), option.url.clone()))
            .collect();

        self.sequencer.enqueue(PrintTask::new("selection", async move {
            if cancel.is_cancelled() {
                return;
            }
            let label_node = surface.append_new(container, Tag::Span, "select-label");
            let mut sink = NodeSink::new(&surface, label_node);
            if typewriter.type_text(&mut sink, &label, &cancel).await != Reveal::Complete {
                return;
            }
            surface.write(|doc| {
                if cancel.is_cancelled() || !doc.is_attached(container) {
                    return;
                }
                let list = doc.create(Tag::Block);
                doc.add_class(list, "terminal-select");
                doc.append(container, list);
                for (text, url) in entries {
                    let option = doc.create(Tag::Block);
                    doc.add_class(option, "select-option");
                    doc.set_text(option, &text);
                    doc.set_interaction(option, Interaction::Navigate(url));
                    doc.append(list, option);
                }
            });
        }));
        RenderedItem {
            primary: container,
            target: container,
        }
    }

    fn render_input(&self, label: &str) -> RenderedItem {
        let container = self.surface.append_to_container(Tag::Block, "input-container");
        let input = self.surface.create(Tag::Input, "terminal-input");
        let surface = self.surface.clone();
        let typewriter = self.typewriter;
        let cancel = self.cancel.clone();
        let label = format!("{}:", label);

        self.sequencer.enqueue(PrintTask::new("input", async move {
            if cancel.is_cancelled() {
                return;
            }
            let label_node = surface.append_new(container, Tag::Span, "input-label");
            let mut sink = NodeSink::new(&surface, label_node);
            if typewriter.type_text(&mut sink, &label, &cancel).await == Reveal::Complete {
                surface.write(|doc| {
                    !cancel.is_cancelled() && doc.is_attached(container) && doc.append(container, input)
                });
            }
        }));
        RenderedItem {
            primary: container,
            target: input,
        }
    }

    fn render_button(&self, label: &str, action: Option<&str>) -> RenderedItem {
        let container = self.surface.append_to_container(Tag::Block, "button-container");
        let button = self.surface.create(Tag::Button, "terminal-button");
        if let Some(action) = action {
            self.surface
                .write(|doc| doc.set_interaction(button, Interaction::Action(action.to_string())));
        }
        self.queue_attach_and_type("button", container, button, label.to_string());
        RenderedItem {
            primary: button,
            target: button,
        }
    }

    fn queue_typing(&self, label: &'static str, node: NodeId, text: String) {
        let typewriter = self.typewriter;
        let cancel = self.cancel.clone();
        let mut sink = NodeSink::new(&self.surface, node);
        self.sequencer.enqueue(PrintTask::new(label, async move {
            typewriter.type_text(&mut sink, &text, &cancel).await;
        }));
    }

    /// Queue a task that attaches `child` to `container`, then types into it.
    fn queue_attach_and_type(&self, label: &'static str, container: NodeId, child: NodeId, text: String) {
        let surface = self.surface.clone();
        let typewriter = self.typewriter;
        let cancel = self.cancel.clone();
        self.sequencer.enqueue(PrintTask::new(label, async move {
            let attached = !cancel.is_cancelled()
                && surface.write(|doc| doc.is_attached(container) && doc.append(container, child));
            if attached {
                let mut sink = NodeSink::new(&surface, child);
                typewriter.type_text(&mut sink, &text, &cancel).await;
            }
        }));
    }
}

/// Prefix glyph for a link label.
pub fn link_prefix(url: Option<&str>, direction: NavDirection) -> &'static str {
    match url.and_then(PageRef::parse) {
        Some(PageRef::Internal(_)) => match direction {
            NavDirection::Back => BACK_PREFIX,
            NavDirection::Forward => FORWARD_PREFIX,
        },
        _ => EXTERNAL_PREFIX,
    }
}

/// Display text of a selection option, `"{bullet} {label}"` or `"{n}. {label}"`.
pub fn option_text(index: usize, option: &SelectOption, bullet: Option<&str>) -> String {
    match bullet {
        Some(bullet) => format!("{} {}", bullet, option.content),
        None => format!("{}. {}", index + 1, option.content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::print::{ImageLoader, RevealTiming};

    fn renderer() -> ContentRenderer {
        let surface = Surface::new(Document::with_container("terminal"), "terminal");
        let loader: Arc<dyn ImageLoader> = Arc::new(crate::print::FsImageLoader::default());
        let revealer = Arc::new(ImageRevealer::new(loader, RevealTiming::default(), Some(1)));
        ContentRenderer::new(
            surface,
            Sequencer::new(),
            Typewriter::default(),
            revealer,
            CancellationToken::new(),
        )
    }

    fn parse(json: &str) -> ContentItem {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn link_prefixes() {
        assert_eq!(link_prefix(Some("#a"), NavDirection::Back), "◃ ");
        assert_eq!(link_prefix(Some("#a"), NavDirection::Forward), "▹ ");
        assert_eq!(link_prefix(Some("https://x"), NavDirection::Back), "▹▹ ");
        assert_eq!(link_prefix(None, NavDirection::Forward), "▹▹ ");
    }

    #[test]
    fn option_bullets() {
        let option = SelectOption {
            content: "Docs".to_string(),
            url: "#docs".to_string(),
        };
        assert_eq!(option_text(0, &option, None), "1. Docs");
        assert_eq!(option_text(2, &option, Some("*")), "* Docs");
    }

    #[tokio::test(start_paused = true)]
    async fn placeholders_exist_before_reveal() {
        let r = renderer();
        r.render_item(&ContentItem::text("one"));
        r.render_item(&ContentItem::text("two"));

        assert_eq!(r.sequencer.pending(), 2);
        let count = r.surface.read(|doc| doc.get(r.surface.container()).unwrap().children().len());
        assert_eq!(count, 2);
        assert!(r.surface.text_lines().is_empty());

        r.sequencer.wait_idle().await;
        assert_eq!(r.surface.text_lines(), vec!["one", "two"]);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_id_and_classes_land_on_the_right_elements() {
        let r = renderer();
        let item = parse(r##"{"type": "link", "content": "Go", "url": "#x", "id": "go", "class": ["big", "red"]}"##);
        let rendered = r.render_item(&item);
        r.sequencer.wait_idle().await;

        r.surface.read(|doc| {
            let container = doc.get(rendered.primary).unwrap();
            assert!(container.has_class("link-container"));
            assert!(container.has_class("big") && container.has_class("red"));
            let anchor = doc.get(rendered.target).unwrap();
            assert_eq!(anchor.id.as_deref(), Some("go"));
            assert_eq!(anchor.text, "▹ Go");
            assert_eq!(anchor.interaction, Some(Interaction::Navigate("#x".to_string())));
        });
    }

    #[tokio::test(start_paused = true)]
    async fn missing_id_is_generated() {
        let r = renderer();
        let rendered = r.render_item(&ContentItem::text("hi"));
        let id = r.surface.read(|doc| doc.get(rendered.target).unwrap().id.clone()).unwrap();
        assert!(is_generated(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn selection_creates_options_after_label() {
        let r = renderer();
        let item = parse(
            r##"{"type": "selection", "content": "Choose",
                "options": [{"content": "A", "url": "#a"}, {"content": "B", "url": "https://b"}]}"##,
        );
        r.render_item(&item);
        r.sequencer.wait_idle().await;

        assert_eq!(r.surface.text_lines(), vec!["Choose", "1. A", "2. B"]);
        let targets: Vec<Option<Interaction>> = r.surface.read(|doc| {
            doc.interactive_nodes(r.surface.container())
                .into_iter()
                .map(|n| doc.get(n).unwrap().interaction.clone())
                .collect()
        });
        assert_eq!(
            targets,
            vec![
                Some(Interaction::Navigate("#a".to_string())),
                Some(Interaction::Navigate("https://b".to_string()))
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn input_gets_label_and_id() {
        let r = renderer();
        let item = parse(r#"{"type": "input", "content": "Name", "id": "name"}"#);
        let rendered = r.render_item(&item);
        r.sequencer.wait_idle().await;

        assert_eq!(r.surface.text_lines(), vec!["Name:[]"]);
        let input = r.surface.read(|doc| doc.find_by_id("name"));
        assert_eq!(input, Some(rendered.target));
        assert!(r.surface.is_attached(rendered.target));
    }

    #[tokio::test(start_paused = true)]
    async fn button_carries_action_name() {
        let r = renderer();
        let item = parse(r#"{"type": "button", "content": "Submit", "action": "show-inputs", "class": "wide"}"#);
        let rendered = r.render_item(&item);
        r.sequencer.wait_idle().await;

        assert_eq!(rendered.primary, rendered.target);
        r.surface.read(|doc| {
            let button = doc.get(rendered.primary).unwrap();
            assert_eq!(button.text, "Submit");
            assert!(button.has_class("terminal-button") && button.has_class("wide"));
            assert_eq!(button.interaction, Some(Interaction::Action("show-inputs".to_string())));
        });
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_render_leaves_placeholders_empty() {
        let r = renderer();
        r.render_item(&parse(r##"{"type": "link", "content": "Go", "url": "#x"}"##));
        r.render_item(&ContentItem::text("text"));
        r.cancel.cancel();
        r.sequencer.wait_idle().await;

        assert!(r.surface.text_lines().is_empty());
    }
}
