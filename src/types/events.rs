use crate::types::options::OptionKey;
use crate::types::tab::{Tab, TabChange};

/// Lifecycle events emitted by the tab directory.
#[derive(Debug, Clone)]
pub enum TabEvent {
    /// A tab was created. Carries the tab's initial state.
    Created(Tab),
    /// One or more fields of a tab changed. `change` holds only the fields
    /// that changed in this update.
    Updated { id: String, change: TabChange },
    /// A tab was closed.
    Removed { id: String },
}

/// Change notification emitted by the options store.
///
/// Carries the set of keys whose stored value actually changed.
#[derive(Debug, Clone)]
pub struct OptionsEvent {
    pub changed: Vec<OptionKey>,
}
