// Tabkeeper unloading pipeline
// Decides which loaded tabs to discard: partitions the window's loaded tabs
// into counted-but-protected and evictable sets, orders the evictable set by
// recency, and discards the tabs that fall past the effective limit.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::managers::mark_store::{is_tab_marked, MarkStoreTrait};
use crate::managers::tab_directory::{get_loaded_tabs, TabDirectoryTrait};
use crate::services::options_store::OptionsStoreTrait;
use crate::types::errors::MarkError;
use crate::types::options::UnloaderOptions;
use crate::types::tab::Tab;

/// Result of partitioning the loaded tab set.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Count of tabs that consume a limit slot but are never unloaded.
    pub excluded: usize,
    /// Tabs allowed to be unloaded from memory, in input order.
    pub evictable: Vec<Tab>,
}

/// Partitions `tabs` into counted-but-protected and evictable sets.
///
/// A marked tab is never evictable; whether it still consumes a limit slot
/// is controlled by `include_marked_tabs_in_limit`. A pinned tab is
/// evictable only when pinned unloading is allowed; while it is not, the tab
/// consumes a limit slot only when `include_pinned_tabs_in_limit` says so.
/// Every remaining tab is evictable, in input order. Each tab is classified
/// exactly once and increments `excluded` at most once, even when both
/// protection rules apply to it.
///
/// Mark lookups are issued concurrently, one per tab, and joined before any
/// classification happens. A mark changing mid-pass may be observed with
/// either value.
pub async fn filter_tabs(
    tabs: &[Tab],
    options: &UnloaderOptions,
    marks: &dyn MarkStoreTrait,
) -> Result<FilterOutcome, MarkError> {
    let lookups = tabs.iter().map(|tab| is_tab_marked(marks, &tab.id));
    let marked: Vec<bool> = join_all(lookups)
        .await
        .into_iter()
        .collect::<Result<_, _>>()?;

    let mut outcome = FilterOutcome::default();
    for (tab, marked) in tabs.iter().zip(marked) {
        let pinned_protected = tab.pinned && !options.allow_pinned_tabs_unloading;
        let counted = (marked && options.include_marked_tabs_in_limit)
            || (pinned_protected && options.include_pinned_tabs_in_limit);
        if counted {
            outcome.excluded += 1;
        } else if !marked && !pinned_protected {
            outcome.evictable.push(tab.clone());
        }
    }
    Ok(outcome)
}

/// Selects the evictable tabs that fall past the effective limit.
///
/// The most recently accessed tabs are kept: the evictable set is ordered
/// most-recent-first (stable, so ties keep their input order) and the suffix
/// beyond `effective_limit` is returned for discarding.
pub fn select_for_discard(evictable: &[Tab], effective_limit: usize) -> Vec<Tab> {
    let mut ordered = evictable.to_vec();
    ordered.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
    ordered.split_off(effective_limit.min(ordered.len()))
}

/// The unloading pipeline over its three collaborators.
pub struct TabUnloader {
    directory: Arc<dyn TabDirectoryTrait>,
    options: Arc<dyn OptionsStoreTrait>,
    marks: Arc<dyn MarkStoreTrait>,
}

impl TabUnloader {
    pub fn new(
        directory: Arc<dyn TabDirectoryTrait>,
        options: Arc<dyn OptionsStoreTrait>,
        marks: Arc<dyn MarkStoreTrait>,
    ) -> Self {
        Self {
            directory,
            options,
            marks,
        }
    }

    /// Unloads the oldest tabs from memory to fit into the tabs limit.
    ///
    /// Any failure of the pipeline itself is logged and the run abandoned;
    /// future runs are unaffected.
    pub async fn unload_if_necessary(&self) {
        if let Err(error) = self.run().await {
            warn!(%error, "unload pass abandoned");
        }
    }

    async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let tabs = get_loaded_tabs(self.directory.as_ref()).await?;
        let options = self.options.get_all().await?;
        let outcome = filter_tabs(&tabs, &options, self.marks.as_ref()).await?;

        let effective_limit =
            (options.loaded_tabs_limit as usize).saturating_sub(outcome.excluded);
        let selected = select_for_discard(&outcome.evictable, effective_limit);
        debug!(
            loaded = tabs.len(),
            excluded = outcome.excluded,
            evictable = outcome.evictable.len(),
            selected = selected.len(),
            "unload pass"
        );

        for tab in selected {
            // Mark state may have changed since the filter pass; marked tabs
            // stay loaded no matter what.
            match is_tab_marked(self.marks.as_ref(), &tab.id).await {
                Ok(true) => continue,
                Ok(false) => {}
                Err(error) => {
                    warn!(tab = %tab.id, %error, "mark re-check failed, skipping tab");
                    continue;
                }
            }
            // Discards are independent; one failure must not stop the rest.
            if let Err(error) = self.directory.discard_tab(&tab.id).await {
                warn!(tab = %tab.id, %error, "failed to discard tab");
            }
        }
        Ok(())
    }
}
