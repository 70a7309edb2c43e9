// Tabkeeper state managers
// Managers model the host side of the system: the window's tab strip and the
// session-scoped per-tab value store.

pub mod mark_store;
pub mod tab_directory;
