// Tabkeeper platform paths for Linux
// Config: ~/.config/tabkeeper

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for Tabkeeper on Linux.
/// Uses `$XDG_CONFIG_HOME/tabkeeper` if set, otherwise `~/.config/tabkeeper`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("tabkeeper")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".config").join("tabkeeper")
    }
}
