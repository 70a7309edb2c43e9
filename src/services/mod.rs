// Tabkeeper services
// Services provide the policy engine and its surfaces: options storage, the
// unloading pipeline, trigger coordination, the mark menu, and the UI facades.

pub mod marked_tabs_page;
pub mod menu_option;
pub mod options_panel;
pub mod options_store;
pub mod trigger;
pub mod unloader;
