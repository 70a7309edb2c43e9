use std::cmp;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

use crate::types::errors::TabError;
use crate::types::events::TabEvent;
use crate::types::tab::{CreateTabProps, Tab, TabChange, TabQuery, NEW_TAB_URL};

/// Capacity of the lifecycle event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Trait defining the tab directory interface.
///
/// All operations are asynchronous; implementations wrap a host tab API or,
/// like [`WindowTabDirectory`], model a window in process.
#[async_trait]
pub trait TabDirectoryTrait: Send + Sync {
    /// Returns the window's tabs matching `query`, in tab-strip order.
    async fn query_tabs(&self, query: TabQuery) -> Result<Vec<Tab>, TabError>;
    /// Returns a snapshot of a single tab.
    async fn get_tab(&self, tab_id: &str) -> Result<Tab, TabError>;
    /// Creates a new tab and returns its initial state.
    async fn create_tab(&self, props: CreateTabProps) -> Result<Tab, TabError>;
    /// Points a tab at a new URL.
    async fn navigate(&self, tab_id: &str, url: &str) -> Result<Tab, TabError>;
    /// Makes a tab the window's active tab, reloading it if discarded.
    async fn activate(&self, tab_id: &str) -> Result<Tab, TabError>;
    /// Pins or unpins a tab.
    async fn set_pinned(&self, tab_id: &str, pinned: bool) -> Result<Tab, TabError>;
    /// Unloads a tab's page content from memory. Discarding an already
    /// discarded tab is a no-op; discarding the active tab is an error.
    async fn discard_tab(&self, tab_id: &str) -> Result<(), TabError>;
    /// Closes a tab.
    async fn remove_tab(&self, tab_id: &str) -> Result<(), TabError>;
    /// Subscribes to the directory's lifecycle events.
    fn subscribe(&self) -> broadcast::Receiver<TabEvent>;
}

struct WindowState {
    tabs: Vec<Tab>,
    // Last issued activation stamp; keeps recency ordering total even when
    // two stamps land in the same millisecond.
    last_stamp: i64,
}

/// In-memory model of one browser window's tab strip.
///
/// Emits a [`TabEvent`] for every mutation, the way a host tab API delivers
/// its created/updated/removed streams.
pub struct WindowTabDirectory {
    state: Mutex<WindowState>,
    events: broadcast::Sender<TabEvent>,
}

impl WindowTabDirectory {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(WindowState {
                tabs: Vec::new(),
                last_stamp: 0,
            }),
            events,
        }
    }

    fn now_ms() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    fn next_stamp(state: &mut WindowState) -> i64 {
        let stamp = cmp::max(Self::now_ms(), state.last_stamp + 1);
        state.last_stamp = stamp;
        stamp
    }

    fn find(state: &WindowState, tab_id: &str) -> Result<usize, TabError> {
        state
            .tabs
            .iter()
            .position(|t| t.id == tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))
    }

    fn reindex(state: &mut WindowState) {
        for (index, tab) in state.tabs.iter_mut().enumerate() {
            tab.index = index;
        }
    }

    // Broadcast with no receivers is fine; events are fire-and-forget.
    fn emit(&self, event: TabEvent) {
        let _ = self.events.send(event);
    }
}

impl Default for WindowTabDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TabDirectoryTrait for WindowTabDirectory {
    async fn query_tabs(&self, query: TabQuery) -> Result<Vec<Tab>, TabError> {
        let state = self.state.lock().await;
        Ok(state
            .tabs
            .iter()
            .filter(|t| query.discarded.map_or(true, |d| t.discarded == d))
            .filter(|t| query.active.map_or(true, |a| t.active == a))
            .cloned()
            .collect())
    }

    async fn get_tab(&self, tab_id: &str) -> Result<Tab, TabError> {
        let state = self.state.lock().await;
        let idx = Self::find(&state, tab_id)?;
        Ok(state.tabs[idx].clone())
    }

    async fn create_tab(&self, props: CreateTabProps) -> Result<Tab, TabError> {
        let mut state = self.state.lock().await;

        let index = match props.index {
            Some(index) => {
                if index > state.tabs.len() {
                    return Err(TabError::InvalidIndex(index));
                }
                index
            }
            None => state.tabs.len(),
        };

        let stamp = Self::next_stamp(&mut state);
        let url = props.url.unwrap_or_else(|| NEW_TAB_URL.to_string());
        let tab = Tab {
            id: Uuid::new_v4().to_string(),
            title: url.clone(),
            url,
            index,
            pinned: props.pinned,
            active: false,
            discarded: false,
            last_accessed: stamp,
        };

        // The first tab in a window is always active.
        let make_active = props.active || state.tabs.is_empty();
        state.tabs.insert(index, tab);
        Self::reindex(&mut state);
        if make_active {
            for t in state.tabs.iter_mut() {
                t.active = false;
            }
            state.tabs[index].active = true;
        }

        let created = state.tabs[index].clone();
        drop(state);
        self.emit(TabEvent::Created(created.clone()));
        Ok(created)
    }

    async fn navigate(&self, tab_id: &str, url: &str) -> Result<Tab, TabError> {
        let mut state = self.state.lock().await;
        let idx = Self::find(&state, tab_id)?;
        state.tabs[idx].url = url.to_string();
        state.tabs[idx].title = url.to_string();
        let tab = state.tabs[idx].clone();
        drop(state);
        self.emit(TabEvent::Updated {
            id: tab.id.clone(),
            change: TabChange {
                url: Some(tab.url.clone()),
                ..TabChange::default()
            },
        });
        Ok(tab)
    }

    async fn activate(&self, tab_id: &str) -> Result<Tab, TabError> {
        let mut state = self.state.lock().await;
        let idx = Self::find(&state, tab_id)?;
        for t in state.tabs.iter_mut() {
            t.active = false;
        }
        let stamp = Self::next_stamp(&mut state);
        let tab = &mut state.tabs[idx];
        tab.active = true;
        tab.last_accessed = stamp;
        let reloaded = tab.discarded;
        tab.discarded = false;
        let snapshot = tab.clone();
        drop(state);
        // Activating a discarded tab reloads it into memory.
        if reloaded {
            self.emit(TabEvent::Updated {
                id: snapshot.id.clone(),
                change: TabChange {
                    discarded: Some(false),
                    ..TabChange::default()
                },
            });
        }
        Ok(snapshot)
    }

    async fn set_pinned(&self, tab_id: &str, pinned: bool) -> Result<Tab, TabError> {
        let mut state = self.state.lock().await;
        let idx = Self::find(&state, tab_id)?;
        if state.tabs[idx].pinned == pinned {
            return Ok(state.tabs[idx].clone());
        }
        state.tabs[idx].pinned = pinned;
        let tab = state.tabs[idx].clone();
        drop(state);
        self.emit(TabEvent::Updated {
            id: tab.id.clone(),
            change: TabChange {
                pinned: Some(pinned),
                ..TabChange::default()
            },
        });
        Ok(tab)
    }

    async fn discard_tab(&self, tab_id: &str) -> Result<(), TabError> {
        let mut state = self.state.lock().await;
        let idx = Self::find(&state, tab_id)?;
        if state.tabs[idx].discarded {
            return Ok(());
        }
        if state.tabs[idx].active {
            return Err(TabError::ActiveTabDiscard(tab_id.to_string()));
        }
        state.tabs[idx].discarded = true;
        let id = state.tabs[idx].id.clone();
        drop(state);
        self.emit(TabEvent::Updated {
            id,
            change: TabChange {
                discarded: Some(true),
                ..TabChange::default()
            },
        });
        Ok(())
    }

    async fn remove_tab(&self, tab_id: &str) -> Result<(), TabError> {
        let mut state = self.state.lock().await;
        let idx = Self::find(&state, tab_id)?;
        let was_active = state.tabs[idx].active;
        state.tabs.remove(idx);
        Self::reindex(&mut state);

        // Switch the active tab to the nearest neighbor.
        let mut reactivated = None;
        if was_active && !state.tabs.is_empty() {
            let neighbor = cmp::min(idx, state.tabs.len() - 1);
            let stamp = Self::next_stamp(&mut state);
            let tab = &mut state.tabs[neighbor];
            tab.active = true;
            tab.last_accessed = stamp;
            if tab.discarded {
                tab.discarded = false;
                reactivated = Some(tab.id.clone());
            }
        }
        drop(state);

        self.emit(TabEvent::Removed {
            id: tab_id.to_string(),
        });
        if let Some(id) = reactivated {
            self.emit(TabEvent::Updated {
                id,
                change: TabChange {
                    discarded: Some(false),
                    ..TabChange::default()
                },
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<TabEvent> {
        self.events.subscribe()
    }
}

/// Collects all tabs loaded into memory from the window.
pub async fn get_loaded_tabs(directory: &dyn TabDirectoryTrait) -> Result<Vec<Tab>, TabError> {
    directory
        .query_tabs(TabQuery {
            discarded: Some(false),
            active: None,
        })
        .await
}

/// Collects all tabs from the window.
pub async fn get_all_tabs(directory: &dyn TabDirectoryTrait) -> Result<Vec<Tab>, TabError> {
    directory.query_tabs(TabQuery::default()).await
}

/// Returns the window's active tab, if one exists.
pub async fn get_current_tab(directory: &dyn TabDirectoryTrait) -> Result<Tab, TabError> {
    let tabs = directory
        .query_tabs(TabQuery {
            discarded: None,
            active: Some(true),
        })
        .await?;
    tabs.into_iter().next().ok_or(TabError::NoActiveTab)
}
