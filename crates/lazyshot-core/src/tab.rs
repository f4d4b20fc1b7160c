//! Host pass-through types: tabs and context-menu descriptors.
//!
//! Fields the background process does not interpret are kept in `extra` so
//! that an event can be forwarded downstream unmodified.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Host-assigned tab identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(i64);

impl TabId {
    /// Wrap a raw host tab id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw host tab id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A browser tab as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Tab identifier.
    pub id: TabId,
    /// Window containing the tab.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<i64>,
    /// Current document URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Current document title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Whether the tab is the active one in its window.
    #[serde(default)]
    pub active: bool,
    /// Remaining host fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tab {
    /// Create a tab with only an id.
    #[must_use]
    pub fn new(id: TabId) -> Self {
        Self {
            id,
            window_id: None,
            url: None,
            title: None,
            active: false,
            extra: Map::new(),
        }
    }

    /// Set the document URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the document title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Details of a context-menu click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuInfo {
    /// Id of the clicked menu item.
    pub menu_item_id: String,
    /// URL of the page the menu was opened on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    /// URL of the frame the menu was opened in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_url: Option<String>,
    /// Selected text, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_text: Option<String>,
    /// Remaining host fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContextMenuInfo {
    /// Create click info for a menu item.
    #[must_use]
    pub fn new(menu_item_id: impl Into<String>) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            page_url: None,
            frame_url: None,
            selection_text: None,
            extra: Map::new(),
        }
    }

    /// Set the page URL.
    #[must_use]
    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = Some(url.into());
        self
    }
}

/// A context-menu item registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuItem {
    /// Stable item id reported back on click.
    pub id: String,
    /// Localized label.
    pub title: String,
    /// Contexts the item appears in (`page`, `link`, ...).
    pub contexts: Vec<String>,
    /// URL match patterns restricting where the item appears.
    pub document_url_patterns: Vec<String>,
}
