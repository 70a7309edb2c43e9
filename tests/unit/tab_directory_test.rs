use tabkeeper::managers::tab_directory::{
    get_all_tabs, get_current_tab, get_loaded_tabs, TabDirectoryTrait, WindowTabDirectory,
};
use tabkeeper::types::errors::TabError;
use tabkeeper::types::events::TabEvent;
use tabkeeper::types::tab::{CreateTabProps, TabQuery, NEW_TAB_URL};

fn props_with_url(url: &str) -> CreateTabProps {
    CreateTabProps {
        url: Some(url.to_string()),
        ..CreateTabProps::default()
    }
}

#[tokio::test]
async fn test_create_tab_returns_unique_ids() {
    let dir = WindowTabDirectory::new();
    let t1 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let t2 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    assert_ne!(t1.id, t2.id);
    assert_eq!(get_all_tabs(&dir).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_tab_default_url_is_placeholder() {
    let dir = WindowTabDirectory::new();
    let tab = dir.create_tab(CreateTabProps::default()).await.unwrap();
    assert_eq!(tab.url, NEW_TAB_URL);
    assert!(!tab.discarded);
}

#[tokio::test]
async fn test_create_tab_with_url() {
    let dir = WindowTabDirectory::new();
    let tab = dir
        .create_tab(props_with_url("https://example.com"))
        .await
        .unwrap();
    assert_eq!(tab.url, "https://example.com");
}

#[tokio::test]
async fn test_first_tab_becomes_active() {
    let dir = WindowTabDirectory::new();
    let tab = dir.create_tab(CreateTabProps::default()).await.unwrap();
    // First tab should become active even if active=false
    assert!(tab.active);
    assert_eq!(get_current_tab(&dir).await.unwrap().id, tab.id);
}

#[tokio::test]
async fn test_create_tab_at_index() {
    let dir = WindowTabDirectory::new();
    let t1 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let t2 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let inserted = dir
        .create_tab(CreateTabProps {
            index: Some(1),
            ..CreateTabProps::default()
        })
        .await
        .unwrap();
    let tabs = get_all_tabs(&dir).await.unwrap();
    let ids: Vec<&str> = tabs.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![&t1.id, &inserted.id, &t2.id]);
    // Indices follow the strip order after the insert
    assert_eq!(tabs[1].index, 1);
    assert_eq!(tabs[2].index, 2);
}

#[tokio::test]
async fn test_create_tab_invalid_index() {
    let dir = WindowTabDirectory::new();
    let result = dir
        .create_tab(CreateTabProps {
            index: Some(5),
            ..CreateTabProps::default()
        })
        .await;
    assert!(matches!(result, Err(TabError::InvalidIndex(5))));
}

#[tokio::test]
async fn test_last_accessed_strictly_increases() {
    let dir = WindowTabDirectory::new();
    let t1 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let t2 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let t3 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    // Even when creations land in the same millisecond
    assert!(t1.last_accessed < t2.last_accessed);
    assert!(t2.last_accessed < t3.last_accessed);
}

#[tokio::test]
async fn test_activate_switches_active_and_stamps() {
    let dir = WindowTabDirectory::new();
    let t1 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let t2 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    assert_eq!(get_current_tab(&dir).await.unwrap().id, t1.id);

    let activated = dir.activate(&t2.id).await.unwrap();
    assert!(activated.active);
    assert!(activated.last_accessed > t2.last_accessed);
    assert_eq!(get_current_tab(&dir).await.unwrap().id, t2.id);
    assert!(!dir.get_tab(&t1.id).await.unwrap().active);
}

#[tokio::test]
async fn test_activate_reloads_discarded_tab() {
    let dir = WindowTabDirectory::new();
    let _active = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let t2 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    dir.discard_tab(&t2.id).await.unwrap();
    assert!(dir.get_tab(&t2.id).await.unwrap().discarded);

    let mut events = dir.subscribe();
    let reactivated = dir.activate(&t2.id).await.unwrap();
    assert!(!reactivated.discarded);

    // Reloading on activation is reported as a discard-state change
    match events.try_recv().unwrap() {
        TabEvent::Updated { id, change } => {
            assert_eq!(id, t2.id);
            assert_eq!(change.discarded, Some(false));
            assert!(change.url.is_none());
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_discard_tab() {
    let dir = WindowTabDirectory::new();
    let _active = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let t2 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    dir.discard_tab(&t2.id).await.unwrap();
    assert!(dir.get_tab(&t2.id).await.unwrap().discarded);
    assert_eq!(get_loaded_tabs(&dir).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_discard_already_discarded_is_noop() {
    let dir = WindowTabDirectory::new();
    let _active = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let t2 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    dir.discard_tab(&t2.id).await.unwrap();

    let mut events = dir.subscribe();
    dir.discard_tab(&t2.id).await.unwrap();
    // No second discard event
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_discard_active_tab_fails() {
    let dir = WindowTabDirectory::new();
    let active = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let result = dir.discard_tab(&active.id).await;
    assert!(matches!(result, Err(TabError::ActiveTabDiscard(_))));
    assert!(!dir.get_tab(&active.id).await.unwrap().discarded);
}

#[tokio::test]
async fn test_discard_unknown_tab_fails() {
    let dir = WindowTabDirectory::new();
    assert!(matches!(
        dir.discard_tab("nonexistent").await,
        Err(TabError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_query_tabs_filters() {
    let dir = WindowTabDirectory::new();
    let t1 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let t2 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let _t3 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    dir.discard_tab(&t2.id).await.unwrap();

    let loaded = get_loaded_tabs(&dir).await.unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded.iter().all(|t| !t.discarded));

    let discarded = dir
        .query_tabs(TabQuery {
            discarded: Some(true),
            active: None,
        })
        .await
        .unwrap();
    assert_eq!(discarded.len(), 1);
    assert_eq!(discarded[0].id, t2.id);

    let active = dir
        .query_tabs(TabQuery {
            discarded: None,
            active: Some(true),
        })
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, t1.id);
}

#[tokio::test]
async fn test_navigate_updates_url_and_emits_change() {
    let dir = WindowTabDirectory::new();
    let tab = dir.create_tab(CreateTabProps::default()).await.unwrap();

    let mut events = dir.subscribe();
    let updated = dir.navigate(&tab.id, "https://example.com").await.unwrap();
    assert_eq!(updated.url, "https://example.com");

    match events.try_recv().unwrap() {
        TabEvent::Updated { id, change } => {
            assert_eq!(id, tab.id);
            assert_eq!(change.url.as_deref(), Some("https://example.com"));
            assert!(change.discarded.is_none());
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_set_pinned() {
    let dir = WindowTabDirectory::new();
    let tab = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let pinned = dir.set_pinned(&tab.id, true).await.unwrap();
    assert!(pinned.pinned);

    // Pinning an already pinned tab emits nothing
    let mut events = dir.subscribe();
    dir.set_pinned(&tab.id, true).await.unwrap();
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_remove_tab_switches_to_neighbor() {
    let dir = WindowTabDirectory::new();
    let t1 = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let t2 = dir
        .create_tab(CreateTabProps {
            active: true,
            ..CreateTabProps::default()
        })
        .await
        .unwrap();
    let t3 = dir.create_tab(CreateTabProps::default()).await.unwrap();

    dir.remove_tab(&t2.id).await.unwrap();
    let current = get_current_tab(&dir).await.unwrap();
    assert!(current.id == t1.id || current.id == t3.id);
    assert_eq!(get_all_tabs(&dir).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_remove_emits_removed_event() {
    let dir = WindowTabDirectory::new();
    let _active = dir.create_tab(CreateTabProps::default()).await.unwrap();
    let t2 = dir.create_tab(CreateTabProps::default()).await.unwrap();

    let mut events = dir.subscribe();
    dir.remove_tab(&t2.id).await.unwrap();
    match events.try_recv().unwrap() {
        TabEvent::Removed { id } => assert_eq!(id, t2.id),
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_remove_last_tab_leaves_empty_window() {
    let dir = WindowTabDirectory::new();
    let tab = dir.create_tab(CreateTabProps::default()).await.unwrap();
    dir.remove_tab(&tab.id).await.unwrap();
    assert!(get_all_tabs(&dir).await.unwrap().is_empty());
    assert!(matches!(
        get_current_tab(&dir).await,
        Err(TabError::NoActiveTab)
    ));
}

#[tokio::test]
async fn test_no_active_tab_in_empty_window() {
    let dir = WindowTabDirectory::new();
    assert!(matches!(
        get_current_tab(&dir).await,
        Err(TabError::NoActiveTab)
    ));
}
