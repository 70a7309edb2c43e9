// Tabkeeper trigger coordination
// Decides, from the window's lifecycle events and the options store's change
// notifications, when the unloading pipeline must run.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::managers::tab_directory::TabDirectoryTrait;
use crate::services::options_store::OptionsStoreTrait;
use crate::services::unloader::TabUnloader;
use crate::types::events::{OptionsEvent, TabEvent};
use crate::types::options::OptionKey;

/// Decides when to run the unloading pipeline.
///
/// Trigger rules:
/// - a tab's discard state changing to loaded triggers a run; a tab leaving
///   memory never does;
/// - a freshly created tab triggers a run once, on its first URL change away
///   from the new-tab placeholder, after which its listener entry is removed;
/// - an options change triggers a run only when the tabs limit itself
///   changed.
///
/// Runs fired by distinct events are independent and not deduplicated; the
/// pipeline is idempotent, so overlap is safe.
pub struct TriggerCoordinator {
    unloader: Arc<TabUnloader>,
    directory: Arc<dyn TabDirectoryTrait>,
    options: Arc<dyn OptionsStoreTrait>,
    /// Tabs still waiting for their first URL change.
    pending_first_url: Mutex<HashSet<String>>,
}

impl TriggerCoordinator {
    pub fn new(
        unloader: Arc<TabUnloader>,
        directory: Arc<dyn TabDirectoryTrait>,
        options: Arc<dyn OptionsStoreTrait>,
    ) -> Self {
        Self {
            unloader,
            directory,
            options,
            pending_first_url: Mutex::new(HashSet::new()),
        }
    }

    /// Updates listener state for a tab event and reports whether it
    /// warrants a pipeline run.
    pub async fn tab_event_triggers(&self, event: &TabEvent) -> bool {
        match event {
            TabEvent::Created(tab) => {
                // New tabs point at the placeholder; evaluating before the
                // real destination is known is premature.
                self.pending_first_url.lock().await.insert(tab.id.clone());
                false
            }
            TabEvent::Updated { id, change } => {
                let became_loaded = change.discarded == Some(false);
                let url_settled =
                    change.url.is_some() && self.pending_first_url.lock().await.remove(id);
                became_loaded || url_settled
            }
            TabEvent::Removed { id } => {
                // Drop the one-shot entry of a tab closed before its URL
                // settled.
                self.pending_first_url.lock().await.remove(id);
                false
            }
        }
    }

    /// Reports whether an options change warrants a pipeline run.
    ///
    /// Only the tabs limit itself is a trigger; the boolean flags take
    /// effect on the next run caused by something else.
    pub fn options_event_triggers(event: &OptionsEvent) -> bool {
        event.changed.contains(&OptionKey::LoadedTabsLimit)
    }

    /// Count of tabs still waiting for their first URL change.
    pub async fn pending_count(&self) -> usize {
        self.pending_first_url.lock().await.len()
    }

    /// Spawns the coordinator's event loop.
    ///
    /// Subscribes to both event streams and runs the pipeline on every
    /// qualifying event until the streams close.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        let coordinator = self;
        let mut tab_events = coordinator.directory.subscribe();
        let mut options_events = coordinator.options.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = tab_events.recv() => match event {
                        Ok(event) => {
                            if coordinator.tab_event_triggers(&event).await {
                                coordinator.unloader.unload_if_necessary().await;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(missed)) => {
                            warn!(missed, "tab event stream lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    event = options_events.recv() => match event {
                        Ok(event) => {
                            if Self::options_event_triggers(&event) {
                                coordinator.unloader.unload_if_necessary().await;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(missed)) => {
                            warn!(missed, "options event stream lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            debug!("trigger coordinator stopped");
        })
    }
}
