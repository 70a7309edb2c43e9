use std::fmt;

// === TabError ===

/// Errors related to tab directory operations.
#[derive(Debug)]
pub enum TabError {
    /// Tab with the given ID was not found in the window.
    NotFound(String),
    /// No tab is active in the current window.
    NoActiveTab,
    /// The active tab cannot be discarded.
    ActiveTabDiscard(String),
    /// The provided tab index is out of bounds.
    InvalidIndex(usize),
}

impl fmt::Display for TabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabError::NotFound(id) => write!(f, "Tab not found: {}", id),
            TabError::NoActiveTab => write!(f, "No active tab in current browser window"),
            TabError::ActiveTabDiscard(id) => {
                write!(f, "Cannot discard the active tab: {}", id)
            }
            TabError::InvalidIndex(index) => write!(f, "Invalid tab index: {}", index),
        }
    }
}

impl std::error::Error for TabError {}

// === MarkError ===

/// Errors related to the per-tab mark store.
#[derive(Debug)]
pub enum MarkError {
    /// Values cannot be stored for a tab the window no longer knows.
    TabNotFound(String),
}

impl fmt::Display for MarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkError::TabNotFound(id) => write!(f, "Cannot store value for unknown tab: {}", id),
        }
    }
}

impl std::error::Error for MarkError {}

// === OptionsError ===

/// Errors related to the options store.
#[derive(Debug)]
pub enum OptionsError {
    /// An I/O error occurred while reading or writing the options file.
    IoError(String),
    /// Failed to serialize or deserialize the options.
    SerializationError(String),
    /// The provided value does not fit the option's type.
    InvalidValue(String),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::IoError(msg) => write!(f, "Options I/O error: {}", msg),
            OptionsError::SerializationError(msg) => {
                write!(f, "Options serialization error: {}", msg)
            }
            OptionsError::InvalidValue(msg) => write!(f, "Invalid option value: {}", msg),
        }
    }
}

impl std::error::Error for OptionsError {}
