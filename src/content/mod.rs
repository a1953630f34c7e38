//! Page content model and loader.
//!
//! Content is one JSON document mapping page ids to pages:
//!
//! ```json
//! {
//!   "home": {"title": "Welcome", "content": ["Hello", {"type": "link", "content": "Go", "url": "#other"}]},
//!   "other": {"title": "Other", "content": ["Bye"]}
//! }
//! ```
//!
//! It is loaded once at startup and never modified afterwards.

mod item;
pub mod reference;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::render::is_generated;

pub use item::{ContentItem, ItemKind, NavDirection, SelectOption};
pub use reference::{PageRef, PAGE_MARKER};

/// Id of the entry page. It never gets the "Restart program" link.
pub const HOME_PAGE: &str = "home";

/// Errors that can occur while loading content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read content file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed content: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Page '{page}' uses id '{id}': the 'auto-' prefix is reserved for generated ids")]
    ReservedId { page: String, id: String },
}

/// A titled, ordered list of content items.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub title: String,
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

/// All pages of a site, keyed by page id.
#[derive(Debug, Clone, Default)]
pub struct ContentSet {
    pages: HashMap<String, Page>,
    /// Directory of the content file, used to resolve image paths
    base_dir: Option<PathBuf>,
}

impl ContentSet {
    /// Parse content from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let pages: HashMap<String, Page> = serde_json::from_str(json)?;
        for (page_id, page) in &pages {
            if let Some(id) = page
                .content
                .iter()
                .filter_map(|item| item.id.as_deref())
                .find(|id| is_generated(id))
            {
                return Err(ContentError::ReservedId {
                    page: page_id.clone(),
                    id: id.to_string(),
                });
            }
        }
        Ok(Self {
            pages,
            base_dir: None,
        })
    }

    /// Read and parse a content file.
    pub async fn load(path: &Path) -> Result<Self, ContentError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ContentError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let mut content = Self::from_json(&json)?;
        content.base_dir = path.parent().map(Path::to_path_buf);
        Ok(content)
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pages.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page ids in sorted order.
    pub fn page_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }
}
