// Tabkeeper options store
// Persists the four extension options as a flat JSON object at the
// platform-specific config path and notifies subscribers of changes.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::platform;
use crate::types::errors::OptionsError;
use crate::types::events::OptionsEvent;
use crate::types::options::{OptionKey, UnloaderOptions};

/// Capacity of the change event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Trait defining the options store interface.
#[async_trait]
pub trait OptionsStoreTrait: Send + Sync {
    /// Returns the current value of every option.
    async fn get_all(&self) -> Result<UnloaderOptions, OptionsError>;
    /// Sets a single option. Persists the new state and notifies
    /// subscribers when the stored value actually changed.
    async fn set(&self, key: OptionKey, value: serde_json::Value) -> Result<(), OptionsError>;
    /// Subscribes to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<OptionsEvent>;
}

/// Options store implementation that persists options as JSON on disk.
pub struct OptionsStore {
    config_path: String,
    options: Mutex<UnloaderOptions>,
    events: broadcast::Sender<OptionsEvent>,
}

impl OptionsStore {
    /// Creates a new OptionsStore.
    ///
    /// If `path_override` is `Some`, uses that path for the options file.
    /// Otherwise, uses the platform-specific config directory with
    /// `options.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => {
                let config_dir = platform::get_config_dir();
                config_dir
                    .join("options.json")
                    .to_string_lossy()
                    .to_string()
            }
        };

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config_path,
            options: Mutex::new(UnloaderOptions::default()),
            events,
        }
    }

    /// Loads options from the JSON file into memory.
    ///
    /// If the file does not exist, the defaults stay in place. If the file
    /// exists but is malformed, returns a serialization error.
    pub async fn load(&self) -> Result<UnloaderOptions, OptionsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            return Ok(self.options.lock().await.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| OptionsError::IoError(format!("Failed to read options file: {}", e)))?;

        let loaded: UnloaderOptions = serde_json::from_str(&content).map_err(|e| {
            OptionsError::SerializationError(format!("Failed to parse options file: {}", e))
        })?;

        let mut options = self.options.lock().await;
        *options = loaded.clone();
        Ok(loaded)
    }

    /// Writes the installation defaults unless an options file already
    /// exists. Returns whether this was a fresh installation.
    pub async fn install_defaults(&self) -> Result<bool, OptionsError> {
        if Path::new(&self.config_path).exists() {
            self.load().await?;
            return Ok(false);
        }
        let defaults = UnloaderOptions::default();
        self.write_file(&defaults)?;
        *self.options.lock().await = defaults;
        debug!(path = %self.config_path, "installed default options");
        Ok(true)
    }

    /// Returns the path to the options file.
    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    fn write_file(&self, options: &UnloaderOptions) -> Result<(), OptionsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                OptionsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(options).map_err(|e| {
            OptionsError::SerializationError(format!("Failed to serialize options: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| OptionsError::IoError(format!("Failed to write options file: {}", e)))
    }

    fn expect_bool(key: OptionKey, value: &serde_json::Value) -> Result<bool, OptionsError> {
        value.as_bool().ok_or_else(|| {
            OptionsError::InvalidValue(format!(
                "{} expects a boolean, got {}",
                key.as_str(),
                value
            ))
        })
    }

    fn apply(
        options: &mut UnloaderOptions,
        key: OptionKey,
        value: serde_json::Value,
    ) -> Result<(), OptionsError> {
        match key {
            OptionKey::LoadedTabsLimit => {
                options.loaded_tabs_limit = value
                    .as_u64()
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| {
                        OptionsError::InvalidValue(format!(
                            "{} expects a non-negative integer, got {}",
                            key.as_str(),
                            value
                        ))
                    })?;
            }
            OptionKey::IncludeMarkedTabsInLimit => {
                options.include_marked_tabs_in_limit = Self::expect_bool(key, &value)?;
            }
            OptionKey::AllowPinnedTabsUnloading => {
                options.allow_pinned_tabs_unloading = Self::expect_bool(key, &value)?;
            }
            OptionKey::IncludePinnedTabsInLimit => {
                options.include_pinned_tabs_in_limit = Self::expect_bool(key, &value)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl OptionsStoreTrait for OptionsStore {
    async fn get_all(&self) -> Result<UnloaderOptions, OptionsError> {
        Ok(self.options.lock().await.clone())
    }

    async fn set(&self, key: OptionKey, value: serde_json::Value) -> Result<(), OptionsError> {
        let mut options = self.options.lock().await;
        let mut updated = options.clone();
        Self::apply(&mut updated, key, value)?;
        if updated == *options {
            return Ok(());
        }
        self.write_file(&updated)?;
        *options = updated;
        drop(options);

        // Broadcast with no receivers is fine; notifications are
        // fire-and-forget.
        let _ = self.events.send(OptionsEvent { changed: vec![key] });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<OptionsEvent> {
        self.events.subscribe()
    }
}
