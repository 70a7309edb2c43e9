//! Tabkeeper — a browser tab-memory manager.
//!
//! Entry point: runs a console demo against a simulated browser window,
//! showing the unloading pipeline, tab marking, and the configuration
//! surfaces.

use tabkeeper::app::App;
use tabkeeper::managers::mark_store::mark_tab;
use tabkeeper::managers::tab_directory::{get_loaded_tabs, TabDirectoryTrait};
use tabkeeper::services::options_store::OptionsStoreTrait;
use tabkeeper::types::options::{OptionKey, UnloaderOptions};
use tabkeeper::types::tab::CreateTabProps;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!();
    println!("Tabkeeper v{} — Demo Mode", env!("CARGO_PKG_VERSION"));
    println!();

    let options_path = std::env::temp_dir()
        .join("tabkeeper_demo_options.json")
        .to_string_lossy()
        .to_string();
    let _ = std::fs::remove_file(&options_path);

    let mut app = App::new(Some(options_path.clone()));
    app.install().await.expect("installation failed");
    app.startup().await.expect("startup failed");

    section("Simulated window");
    let mut tab_ids = Vec::new();
    for i in 0..8 {
        let tab = app
            .directory
            .create_tab(CreateTabProps {
                url: Some(format!("https://example.com/page/{}", i)),
                active: i == 7,
                ..CreateTabProps::default()
            })
            .await
            .expect("tab creation failed");
        tab_ids.push(tab.id);
    }
    println!(
        "  Created 8 tabs, loaded = {}",
        get_loaded_tabs(app.directory.as_ref()).await.unwrap().len()
    );

    section("Lowering the limit to 5");
    app.options
        .set(OptionKey::LoadedTabsLimit, serde_json::json!(5))
        .await
        .expect("option update failed");
    // Give the coordinator a moment to react to the change event.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let loaded = get_loaded_tabs(app.directory.as_ref()).await.unwrap();
    println!("  Loaded after eviction = {} (oldest tabs discarded)", loaded.len());

    section("Marking protects a tab");
    let oldest = &tab_ids[0];
    app.directory.activate(oldest).await.expect("activation failed");
    mark_tab(app.marks.as_ref(), oldest).await.expect("marking failed");
    println!("  Marked and reloaded the oldest tab");
    let rows = app.marked_tabs_page.rows().await.expect("listing failed");
    println!("  Marked-tabs page rows: {}", rows.len());

    section("Configuration popup");
    let state = app.options_panel.state().await.expect("panel state failed");
    println!("  Limit = {}", state.options.loaded_tabs_limit);
    println!("  Loaded tabs counter = {}", state.loaded_tabs);
    println!(
        "  Include-pinned option editable = {}",
        state.include_pinned_enabled
    );
    app.options_panel
        .save(&UnloaderOptions {
            loaded_tabs_limit: 3,
            ..state.options
        })
        .await
        .expect("saving options failed");
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    println!(
        "  Saved limit 3, loaded now = {}",
        get_loaded_tabs(app.directory.as_ref()).await.unwrap().len()
    );

    app.shutdown();
    let _ = std::fs::remove_file(&options_path);
    println!();
    println!("Demo finished.");
}

fn section(name: &str) {
    println!("---------------------------------------------------------------");
    println!("  {}", name);
    println!("---------------------------------------------------------------");
}
