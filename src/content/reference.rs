//! Page references.
//!
//! A reference starting with [`PAGE_MARKER`] names a page in the loaded
//! content; anything else is an external URL.

/// Prefix that marks an internal page reference (`#home`).
pub const PAGE_MARKER: char = '#';

/// A parsed link or option target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRef<'a> {
    /// Page identifier with the marker stripped
    Internal(&'a str),
    /// External URL, opened in a new browsing context
    External(&'a str),
}

impl<'a> PageRef<'a> {
    /// Parse a raw reference. Empty references resolve to nothing.
    pub fn parse(raw: &'a str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        match raw.strip_prefix(PAGE_MARKER) {
            Some(id) => Some(Self::Internal(id)),
            None => Some(Self::External(raw)),
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

/// Build an internal reference for a page id (`home` -> `#home`).
pub fn internal(page_id: &str) -> String {
    format!("{}{}", PAGE_MARKER, page_id)
}
