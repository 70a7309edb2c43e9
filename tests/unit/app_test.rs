use std::time::Duration;

use tabkeeper::app::App;
use tabkeeper::managers::tab_directory::{get_loaded_tabs, TabDirectoryTrait};
use tabkeeper::services::options_store::OptionsStoreTrait;
use tabkeeper::types::options::OptionKey;
use tabkeeper::types::tab::CreateTabProps;

fn temp_options_path() -> String {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json").to_string_lossy().to_string();
    std::mem::forget(dir);
    path
}

async fn populate(app: &App, count: usize) -> Vec<String> {
    let mut ids = Vec::new();
    for i in 0..count {
        let tab = app
            .directory
            .create_tab(CreateTabProps {
                url: Some(format!("https://example.com/{}", i)),
                active: i == count - 1,
                ..CreateTabProps::default()
            })
            .await
            .unwrap();
        ids.push(tab.id);
    }
    ids
}

// Installation seeds the defaults and establishes the baseline with one
// pipeline run.
#[tokio::test]
async fn test_install_seeds_defaults_and_runs_baseline() {
    let path = temp_options_path();
    let app = App::new(Some(path.clone()));
    populate(&app, 30).await;

    app.install().await.unwrap();

    assert_eq!(app.options.get_all().await.unwrap().loaded_tabs_limit, 25);
    assert_eq!(
        get_loaded_tabs(app.directory.as_ref()).await.unwrap().len(),
        25
    );
}

// A second installation over an existing options file neither re-seeds nor
// re-runs the baseline.
#[tokio::test]
async fn test_reinstall_keeps_existing_options() {
    let path = temp_options_path();
    let app = App::new(Some(path.clone()));
    app.install().await.unwrap();
    app.options
        .set(OptionKey::LoadedTabsLimit, serde_json::json!(3))
        .await
        .unwrap();

    let app2 = App::new(Some(path));
    populate(&app2, 6).await;
    app2.install().await.unwrap();

    assert_eq!(app2.options.get_all().await.unwrap().loaded_tabs_limit, 3);
    // No baseline run happened; the window is still over the limit
    assert_eq!(
        get_loaded_tabs(app2.directory.as_ref()).await.unwrap().len(),
        6
    );
}

// After startup the coordinator reacts to lifecycle events.
#[tokio::test]
async fn test_startup_wires_trigger_coordinator() {
    let mut app = App::new(Some(temp_options_path()));
    app.install().await.unwrap();
    app.options
        .set(OptionKey::LoadedTabsLimit, serde_json::json!(4))
        .await
        .unwrap();
    app.startup().await.unwrap();

    let ids = populate(&app, 8).await;
    // A tab reloading is a qualifying event
    app.directory.discard_tab(&ids[0]).await.unwrap();
    app.directory.activate(&ids[0]).await.unwrap();

    let mut converged = false;
    for _ in 0..100 {
        if get_loaded_tabs(app.directory.as_ref()).await.unwrap().len() == 4 {
            converged = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(converged, "coordinator never ran after startup");

    app.shutdown();
}

// Startup picks up options persisted by a previous session.
#[tokio::test]
async fn test_startup_loads_persisted_options() {
    let path = temp_options_path();
    {
        let app = App::new(Some(path.clone()));
        app.install().await.unwrap();
        app.options
            .set(OptionKey::AllowPinnedTabsUnloading, serde_json::json!(true))
            .await
            .unwrap();
    }

    let mut app = App::new(Some(path));
    app.startup().await.unwrap();
    assert!(app
        .options
        .get_all()
        .await
        .unwrap()
        .allow_pinned_tabs_unloading);
    app.shutdown();
}
