use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::managers::tab_directory::TabDirectoryTrait;
use crate::types::errors::MarkError;

/// The key a tab's mark state is stored under.
pub const MARKED_TAB_VALUE_NAME: &str = "isMarked";

/// Trait defining the per-tab key/value store interface.
///
/// Values are session-scoped: they survive a tab reload but not a tab close.
#[async_trait]
pub trait MarkStoreTrait: Send + Sync {
    /// Returns the value stored for a tab under `key`, if any.
    async fn get_tab_value(&self, tab_id: &str, key: &str) -> Result<Option<String>, MarkError>;
    /// Stores a value for a tab under `key`. Fails for tabs the window no
    /// longer knows.
    async fn set_tab_value(&self, tab_id: &str, key: &str, value: &str) -> Result<(), MarkError>;
    /// Removes the value stored for a tab under `key`, if any.
    async fn remove_tab_value(&self, tab_id: &str, key: &str) -> Result<(), MarkError>;
}

/// Session-scoped per-tab value store backed by the window's tab directory.
///
/// Entries for closed tabs are unreachable through `get_tab_value` and are
/// pruned as they are encountered, so marks die with their tab.
pub struct SessionMarkStore {
    directory: Arc<dyn TabDirectoryTrait>,
    values: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl SessionMarkStore {
    pub fn new(directory: Arc<dyn TabDirectoryTrait>) -> Self {
        Self {
            directory,
            values: Mutex::new(HashMap::new()),
        }
    }

    async fn tab_is_live(&self, tab_id: &str) -> bool {
        self.directory.get_tab(tab_id).await.is_ok()
    }
}

#[async_trait]
impl MarkStoreTrait for SessionMarkStore {
    async fn get_tab_value(&self, tab_id: &str, key: &str) -> Result<Option<String>, MarkError> {
        if !self.tab_is_live(tab_id).await {
            self.values.lock().await.remove(tab_id);
            return Ok(None);
        }
        let values = self.values.lock().await;
        Ok(values
            .get(tab_id)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn set_tab_value(&self, tab_id: &str, key: &str, value: &str) -> Result<(), MarkError> {
        if !self.tab_is_live(tab_id).await {
            self.values.lock().await.remove(tab_id);
            return Err(MarkError::TabNotFound(tab_id.to_string()));
        }
        let mut values = self.values.lock().await;
        values
            .entry(tab_id.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_tab_value(&self, tab_id: &str, key: &str) -> Result<(), MarkError> {
        let mut values = self.values.lock().await;
        if let Some(entries) = values.get_mut(tab_id) {
            entries.remove(key);
            if entries.is_empty() {
                values.remove(tab_id);
            }
        }
        Ok(())
    }
}

/// Marks a tab as forbidden to be unloaded from memory.
pub async fn mark_tab(marks: &dyn MarkStoreTrait, tab_id: &str) -> Result<(), MarkError> {
    marks
        .set_tab_value(tab_id, MARKED_TAB_VALUE_NAME, "true")
        .await
}

/// Unmarks a tab, making it eligible for unloading again.
pub async fn unmark_tab(marks: &dyn MarkStoreTrait, tab_id: &str) -> Result<(), MarkError> {
    marks.remove_tab_value(tab_id, MARKED_TAB_VALUE_NAME).await
}

/// Checks whether a tab is marked as forbidden to be unloaded.
///
/// Any stored value counts as marked; absence means unmarked.
pub async fn is_tab_marked(marks: &dyn MarkStoreTrait, tab_id: &str) -> Result<bool, MarkError> {
    Ok(marks
        .get_tab_value(tab_id, MARKED_TAB_VALUE_NAME)
        .await?
        .is_some())
}
