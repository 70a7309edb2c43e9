//! App Core for Tabkeeper.
//!
//! Central struct holding the stores, the unloading pipeline, and the
//! trigger coordinator, managing application lifecycle. Event subscriptions
//! are set up once in `startup` and torn down in `shutdown`.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::managers::mark_store::SessionMarkStore;
use crate::managers::tab_directory::WindowTabDirectory;
use crate::services::marked_tabs_page::MarkedTabsPage;
use crate::services::menu_option::MarkTabMenu;
use crate::services::options_panel::OptionsPanel;
use crate::services::options_store::OptionsStore;
use crate::services::trigger::TriggerCoordinator;
use crate::services::unloader::TabUnloader;
use crate::types::errors::OptionsError;

/// Central application struct holding all managers and services.
pub struct App {
    pub directory: Arc<WindowTabDirectory>,
    pub marks: Arc<SessionMarkStore>,
    pub options: Arc<OptionsStore>,
    pub unloader: Arc<TabUnloader>,
    pub menu: MarkTabMenu,
    pub marked_tabs_page: MarkedTabsPage,
    pub options_panel: OptionsPanel,
    coordinator: Arc<TriggerCoordinator>,
    coordinator_task: Option<JoinHandle<()>>,
}

impl App {
    /// Creates a new App, initializing all managers and services.
    ///
    /// If `options_path` is `Some`, the options store persists there instead
    /// of the platform config path.
    pub fn new(options_path: Option<String>) -> Self {
        let directory = Arc::new(WindowTabDirectory::new());
        let marks = Arc::new(SessionMarkStore::new(directory.clone()));
        let options = Arc::new(OptionsStore::new(options_path));

        let unloader = Arc::new(TabUnloader::new(
            directory.clone(),
            options.clone(),
            marks.clone(),
        ));
        let coordinator = Arc::new(TriggerCoordinator::new(
            unloader.clone(),
            directory.clone(),
            options.clone(),
        ));

        let menu = MarkTabMenu::new(marks.clone());
        let marked_tabs_page = MarkedTabsPage::new(directory.clone(), marks.clone());
        let options_panel = OptionsPanel::new(directory.clone(), options.clone());

        Self {
            directory,
            marks,
            options,
            unloader,
            menu,
            marked_tabs_page,
            options_panel,
            coordinator,
            coordinator_task: None,
        }
    }

    /// Installation sequence: seed the default options and establish the
    /// baseline by running the pipeline once. Does nothing when the options
    /// file already exists.
    pub async fn install(&self) -> Result<(), OptionsError> {
        if self.options.install_defaults().await? {
            info!("fresh installation, running baseline unload pass");
            self.unloader.unload_if_necessary().await;
        }
        Ok(())
    }

    /// Startup sequence: load the persisted options and spawn the trigger
    /// coordinator.
    pub async fn startup(&mut self) -> Result<(), OptionsError> {
        self.options.load().await?;
        if self.coordinator_task.is_none() {
            self.coordinator_task = Some(self.coordinator.clone().spawn());
        }
        Ok(())
    }

    /// Shutdown sequence: stop the trigger coordinator.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.coordinator_task.take() {
            task.abort();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
