use serde::{Deserialize, Serialize};

/// URL a freshly created tab points at before its first real navigation.
pub const NEW_TAB_URL: &str = "about:newtab";

/// Represents a browser tab with its current state.
///
/// Owned by the window; this crate reads these snapshots and mutates specific
/// fields only through the tab directory operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tab {
    pub id: String,
    pub url: String,
    pub title: String,
    /// Position in the tab strip, left to right.
    pub index: usize,
    pub pinned: bool,
    pub active: bool,
    /// True once the tab's page content has been unloaded from memory.
    pub discarded: bool,
    /// Millisecond timestamp of the last activation.
    pub last_accessed: i64,
}

/// Changed-field set delivered with a tab update event.
///
/// A `Some` field carries the new value; `None` means the field did not
/// change in this update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabChange {
    pub url: Option<String>,
    pub discarded: Option<bool>,
    pub pinned: Option<bool>,
}

/// Filters for querying the window's tabs.
///
/// A `None` field matches any value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabQuery {
    pub discarded: Option<bool>,
    pub active: Option<bool>,
}

/// Properties for creating a new tab.
#[derive(Debug, Clone, Default)]
pub struct CreateTabProps {
    /// Initial URL; the new-tab placeholder when absent.
    pub url: Option<String>,
    /// Position in the tab strip; appended at the end when absent.
    pub index: Option<usize>,
    pub active: bool,
    pub pinned: bool,
}
