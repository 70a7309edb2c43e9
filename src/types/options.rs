use serde::{Deserialize, Serialize};

/// The four option keys persisted by the options store.
///
/// `as_str` returns the storage key name each value is persisted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// Count of tabs allowed to be loaded into memory.
    LoadedTabsLimit,
    /// Should marked tabs be included in the tabs limit or not.
    IncludeMarkedTabsInLimit,
    /// Is unloading pinned tabs from memory allowed.
    AllowPinnedTabsUnloading,
    /// Should pinned tabs be included in the tabs limit or not.
    /// Only meaningful while pinned tabs are forbidden to be unloaded.
    IncludePinnedTabsInLimit,
}

impl OptionKey {
    pub const ALL: [OptionKey; 4] = [
        OptionKey::LoadedTabsLimit,
        OptionKey::IncludeMarkedTabsInLimit,
        OptionKey::AllowPinnedTabsUnloading,
        OptionKey::IncludePinnedTabsInLimit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::LoadedTabsLimit => "loadedTabsLimit",
            OptionKey::IncludeMarkedTabsInLimit => "includeMarkedTabsInLimit",
            OptionKey::AllowPinnedTabsUnloading => "allowPinnedTabsUnloading",
            OptionKey::IncludePinnedTabsInLimit => "includePinnedTabsInLimit",
        }
    }
}

/// All extension options with their installation-time defaults.
///
/// Persisted as a flat JSON object holding exactly these four keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnloaderOptions {
    #[serde(rename = "loadedTabsLimit")]
    pub loaded_tabs_limit: u32,
    #[serde(rename = "includeMarkedTabsInLimit")]
    pub include_marked_tabs_in_limit: bool,
    #[serde(rename = "allowPinnedTabsUnloading")]
    pub allow_pinned_tabs_unloading: bool,
    #[serde(rename = "includePinnedTabsInLimit")]
    pub include_pinned_tabs_in_limit: bool,
}

impl Default for UnloaderOptions {
    fn default() -> Self {
        Self {
            loaded_tabs_limit: 25,
            include_marked_tabs_in_limit: true,
            allow_pinned_tabs_unloading: false,
            include_pinned_tabs_in_limit: false,
        }
    }
}
