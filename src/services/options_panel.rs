// Tabkeeper options panel
// Typed facade behind the configuration popup: a view of the four options
// plus the loaded-tab counter, and a save path for the submitted form.

use std::sync::Arc;

use serde_json::json;

use crate::managers::tab_directory::{get_loaded_tabs, TabDirectoryTrait};
use crate::services::options_store::OptionsStoreTrait;
use crate::types::options::{OptionKey, UnloaderOptions};

/// What the configuration popup shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub options: UnloaderOptions,
    /// Count of tabs currently loaded into memory.
    pub loaded_tabs: usize,
    /// Whether the include-pinned-tabs option is editable. The option only
    /// matters while pinned unloading is disallowed, so the form disables it
    /// otherwise.
    pub include_pinned_enabled: bool,
}

/// Backing service for the configuration popup.
pub struct OptionsPanel {
    directory: Arc<dyn TabDirectoryTrait>,
    options: Arc<dyn OptionsStoreTrait>,
}

impl OptionsPanel {
    pub fn new(directory: Arc<dyn TabDirectoryTrait>, options: Arc<dyn OptionsStoreTrait>) -> Self {
        Self { directory, options }
    }

    /// Collects the current options and tab counter for display.
    pub async fn state(&self) -> Result<PanelState, Box<dyn std::error::Error + Send + Sync>> {
        let options = self.options.get_all().await?;
        let loaded_tabs = get_loaded_tabs(self.directory.as_ref()).await?.len();
        Ok(PanelState {
            include_pinned_enabled: !options.allow_pinned_tabs_unloading,
            options,
            loaded_tabs,
        })
    }

    /// Saves every option from a submitted form.
    pub async fn save(
        &self,
        form: &UnloaderOptions,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.options
            .set(OptionKey::LoadedTabsLimit, json!(form.loaded_tabs_limit))
            .await?;
        self.options
            .set(
                OptionKey::IncludeMarkedTabsInLimit,
                json!(form.include_marked_tabs_in_limit),
            )
            .await?;
        self.options
            .set(
                OptionKey::AllowPinnedTabsUnloading,
                json!(form.allow_pinned_tabs_unloading),
            )
            .await?;
        self.options
            .set(
                OptionKey::IncludePinnedTabsInLimit,
                json!(form.include_pinned_tabs_in_limit),
            )
            .await?;
        Ok(())
    }
}
