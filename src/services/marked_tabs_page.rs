// Tabkeeper marked-tabs page
// Backs the page listing every marked tab in the window, with unmark and
// show actions. Rendering is the UI layer's job; this service produces the
// rows and performs the actions.

use std::sync::Arc;

use tracing::warn;

use crate::managers::mark_store::{is_tab_marked, unmark_tab, MarkStoreTrait};
use crate::managers::tab_directory::{get_all_tabs, get_current_tab, TabDirectoryTrait};
use crate::types::errors::{MarkError, TabError};
use crate::types::tab::{CreateTabProps, Tab};

/// URL of the marked-tabs listing page.
pub const MARKED_TABS_PAGE_URL: &str = "tabkeeper://marked-tabs";

/// One row of the marked-tabs listing.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkedTabRow {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// Backing service for the marked-tabs listing page.
pub struct MarkedTabsPage {
    directory: Arc<dyn TabDirectoryTrait>,
    marks: Arc<dyn MarkStoreTrait>,
}

impl MarkedTabsPage {
    pub fn new(directory: Arc<dyn TabDirectoryTrait>, marks: Arc<dyn MarkStoreTrait>) -> Self {
        Self { directory, marks }
    }

    /// Opens the listing page in a new active tab right after the current
    /// one. Fails when the window has no active tab.
    pub async fn open(&self) -> Result<Tab, TabError> {
        let current = get_current_tab(self.directory.as_ref()).await?;
        self.directory
            .create_tab(CreateTabProps {
                active: true,
                url: Some(MARKED_TABS_PAGE_URL.to_string()),
                index: Some(current.index + 1),
                pinned: false,
            })
            .await
    }

    /// Lists every marked tab in the window as a row.
    ///
    /// A failed mark lookup drops that tab from the listing with a warning;
    /// the rest of the rows are unaffected.
    pub async fn rows(&self) -> Result<Vec<MarkedTabRow>, TabError> {
        let tabs = get_all_tabs(self.directory.as_ref()).await?;
        let mut rows = Vec::new();
        for tab in tabs {
            match is_tab_marked(self.marks.as_ref(), &tab.id).await {
                Ok(true) => rows.push(MarkedTabRow {
                    id: tab.id,
                    title: tab.title,
                    url: tab.url,
                }),
                Ok(false) => {}
                Err(error) => {
                    warn!(tab = %tab.id, %error, "mark lookup failed, dropping row");
                }
            }
        }
        Ok(rows)
    }

    /// Unmarks a tab from its row's unmark action.
    pub async fn unmark(&self, tab_id: &str) -> Result<(), MarkError> {
        unmark_tab(self.marks.as_ref(), tab_id).await
    }

    /// Activates a tab from its row's show action.
    pub async fn show(&self, tab_id: &str) -> Result<Tab, TabError> {
        self.directory.activate(tab_id).await
    }
}
