//! Content items.
//!
//! The JSON format is flat (`{"type": "link", "content": "Go", "url": "#x"}`)
//! and a bare string stands for a text item. Both are read into
//! [`RawItem`] first and then converted into the typed [`ContentItem`].

use serde::Deserialize;

/// Direction hint for links. Only changes the prefix glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavDirection {
    Back,
    #[default]
    Forward,
}

/// One entry of a selection list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectOption {
    /// Label shown after the bullet
    pub content: String,
    /// Page reference or URL to navigate to
    pub url: String,
}

/// Kind-specific part of a content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Text,
    /// `content` holds the image reference
    Image,
    Link {
        url: Option<String>,
        direction: NavDirection,
    },
    Selection {
        options: Vec<SelectOption>,
        /// Custom bullet; numeric bullets when absent
        bullet: Option<String>,
    },
    Input,
    Button {
        /// Name of a registered action
        action: Option<String>,
    },
}

/// One renderable unit of a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ItemEntry")]
pub struct ContentItem {
    pub kind: ItemKind,
    /// Display text (image reference for images)
    pub content: String,
    /// Author-supplied element id
    pub id: Option<String>,
    /// CSS-style class tags
    pub classes: Vec<String>,
}

impl ContentItem {
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ItemKind::Text, content)
    }

    pub fn link(content: impl Into<String>, url: impl Into<String>, direction: NavDirection) -> Self {
        Self::new(
            ItemKind::Link {
                url: Some(url.into()),
                direction,
            },
            content,
        )
    }

    pub fn new(kind: ItemKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            id: None,
            classes: Vec::new(),
        }
    }

    /// Short kind name, used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ItemKind::Text => "text",
            ItemKind::Image => "image",
            ItemKind::Link { .. } => "link",
            ItemKind::Selection { .. } => "selection",
            ItemKind::Input => "input",
            ItemKind::Button { .. } => "button",
        }
    }
}

/// `class` may be a single tag or a list of tags.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ClassList {
    One(String),
    Many(Vec<String>),
}

impl From<ClassList> for Vec<String> {
    fn from(list: ClassList) -> Self {
        match list {
            ClassList::One(class) => vec![class],
            ClassList::Many(classes) => classes,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindTag {
    Text,
    Image,
    Link,
    Selection,
    Input,
    Button,
}

/// Item as written in the content file.
#[derive(Debug, Clone, Deserialize)]
struct RawItem {
    #[serde(rename = "type")]
    kind: KindTag,
    #[serde(default)]
    content: String,
    url: Option<String>,
    #[serde(default)]
    options: Vec<SelectOption>,
    action: Option<String>,
    id: Option<String>,
    class: Option<ClassList>,
    #[serde(rename = "navigation-dir")]
    navigation_dir: Option<NavDirection>,
    bullet: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ItemEntry {
    Text(String),
    Item(RawItem),
}

impl From<ItemEntry> for ContentItem {
    fn from(entry: ItemEntry) -> Self {
        let raw = match entry {
            ItemEntry::Text(text) => return ContentItem::text(text),
            ItemEntry::Item(raw) => raw,
        };

        let kind = match raw.kind {
            KindTag::Text => ItemKind::Text,
            KindTag::Image => ItemKind::Image,
            KindTag::Link => ItemKind::Link {
                url: raw.url,
                direction: raw.navigation_dir.unwrap_or_default(),
            },
            KindTag::Selection => ItemKind::Selection {
                options: raw.options,
                bullet: raw.bullet.filter(|b| !b.is_empty()),
            },
            KindTag::Input => ItemKind::Input,
            KindTag::Button => ItemKind::Button { action: raw.action },
        };

        ContentItem {
            kind,
            content: raw.content,
            id: raw.id.filter(|id| !id.is_empty()),
            classes: raw.class.map(Vec::from).unwrap_or_default(),
        }
    }
}
