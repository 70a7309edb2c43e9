// Tabkeeper mark-tab menu option
// Models the context-menu checkbox that toggles a tab's mark state.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::managers::mark_store::{is_tab_marked, mark_tab, unmark_tab, MarkStoreTrait};
use crate::types::errors::MarkError;

/// ID of the mark-tab option in the browser's context menu.
pub const MARK_TAB_OPTION_ID: &str = "mark_tab_option";

/// Title shown on the menu option.
pub const MARK_TAB_OPTION_TITLE: &str = "Mark as not unloadable";

/// Checkbox menu option that marks (or unmarks) the tab it was opened on.
pub struct MarkTabMenu {
    marks: Arc<dyn MarkStoreTrait>,
    checked: Mutex<bool>,
}

impl MarkTabMenu {
    pub fn new(marks: Arc<dyn MarkStoreTrait>) -> Self {
        Self {
            marks,
            checked: Mutex::new(false),
        }
    }

    /// Loads the checkbox state from the tab's mark when the menu is shown.
    pub async fn shown(&self, tab_id: &str) -> Result<bool, MarkError> {
        let marked = is_tab_marked(self.marks.as_ref(), tab_id).await?;
        *self.checked.lock().await = marked;
        Ok(marked)
    }

    /// Resets the checkbox when the menu is hidden.
    pub async fn hidden(&self) {
        *self.checked.lock().await = false;
    }

    /// Toggles the tab's mark state from a click on the option.
    ///
    /// `checked` is the checkbox state after the click.
    pub async fn clicked(&self, tab_id: &str, checked: bool) -> Result<(), MarkError> {
        if checked {
            mark_tab(self.marks.as_ref(), tab_id).await?;
        } else {
            unmark_tab(self.marks.as_ref(), tab_id).await?;
        }
        *self.checked.lock().await = checked;
        Ok(())
    }

    /// Current checkbox state.
    pub async fn is_checked(&self) -> bool {
        *self.checked.lock().await
    }
}
