//! Integration tests for guarded folder loading, failures and refresh.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use filepick_core::config::browser::BrowserConfig;
use filepick_core::error::ErrorKind;
use filepick_core::types::{ConnectionId, Node};
use filepick_source::local::LocalDirLister;
use filepick_source::memory::FixtureTree;
use filepick_tree::session::FetchOutcome;
use filepick_tree::{BrowserSession, FolderKey};

use helpers::{TestBrowser, deep, id, ids};

#[tokio::test(start_paused = true)]
async fn test_concurrent_fetches_issue_one_request() {
    let browser = TestBrowser::new(deep()).await;
    browser
        .lister
        .set_delay(Some(id("a")), Duration::from_millis(200));
    let key = FolderKey::Folder(id("a"));

    let (first, second) = tokio::join!(browser.session.fetch(&key), browser.session.fetch(&key));
    let outcomes = [first.unwrap(), second.unwrap()];
    assert!(outcomes.iter().any(|o| matches!(o, FetchOutcome::Loaded(_))));
    assert!(outcomes.contains(&FetchOutcome::AlreadyLoading));
    assert_eq!(browser.calls("a"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_opens_push_one_frame() {
    let browser = TestBrowser::new(deep()).await;
    browser
        .lister
        .set_delay(Some(id("a")), Duration::from_millis(200));
    let session = &browser.session;

    let (id_a1, id_a2) = (id("a"), id("a"));
    let (first, second) = tokio::join!(
        session.open_folder(&id_a1, "a"),
        session.open_folder(&id_a2, "a")
    );
    first.unwrap();
    second.unwrap();
    assert_eq!(session.breadcrumbs().await.len(), 1);
    assert_eq!(browser.calls("a"), 1);
}

#[tokio::test]
async fn test_failed_fetch_leaves_folder_unknown() {
    let browser = TestBrowser::new(deep()).await;
    let session = &browser.session;
    browser.lister.fail_next(Some(id("a")), 1);
    let key = FolderKey::Folder(id("a"));

    let err = session.open_folder(&id("a"), "a").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);
    assert!(!session.is_known(&key).await);
    assert!(!session.is_loading(&key).await);
    assert!(session.breadcrumbs().await.is_empty());

    // Re-triggering is the retry.
    session.open_folder(&id("a"), "a").await.unwrap();
    assert_eq!(session.breadcrumbs().await.len(), 1);
    assert_eq!(browser.calls("a"), 2);
}

#[tokio::test]
async fn test_background_failure_is_reported_once() {
    let browser = TestBrowser::new(deep()).await;
    let session = &browser.session;
    browser.lister.fail_next(Some(id("a")), 1);

    session.toggle_folder(&id("a")).await;
    session.settle().await;

    let errors = session.take_load_errors().await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, FolderKey::Folder(id("a")));
    assert!(session.take_load_errors().await.is_empty());
    assert!(!session.is_known(&FolderKey::Folder(id("a"))).await);
    // The optimistic mark stays; the folder is simply still unknown.
    assert!(session.is_folder_fully_selected(&id("a")).await);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_discards_stale_results() {
    let browser = TestBrowser::new(deep()).await;
    let session = &browser.session;
    browser
        .lister
        .set_delay(Some(id("a")), Duration::from_millis(500));
    let key = FolderKey::Folder(id("a"));

    session.toggle_folder(&id("a")).await;
    while !session.is_loading(&key).await {
        tokio::task::yield_now().await;
    }

    session.refresh().await.unwrap();
    assert!(session.selected_ids().await.is_empty());
    assert_eq!(session.snapshot().await.generation, 1);

    session.settle().await;
    assert!(!session.is_known(&key).await);
    assert!(session.selected_ids().await.is_empty());
    assert_eq!(ids(&session.displayed().await), vec!["a", "top"]);
}

#[tokio::test]
async fn test_switch_connection_resets_state() {
    let browser = TestBrowser::new(deep()).await;
    let session = &browser.session;
    session.open_folder(&id("a"), "a").await.unwrap();
    session.toggle_node(&id("a1")).await;

    session
        .switch_connection(ConnectionId::new("other"))
        .await
        .unwrap();
    assert_eq!(session.connection().await.as_str(), "other");
    assert!(session.breadcrumbs().await.is_empty());
    assert!(session.selected_ids().await.is_empty());
    assert!(!session.is_known(&FolderKey::Folder(id("a"))).await);
    assert_eq!(session.displayed().await.len(), 2);
}

#[tokio::test]
async fn test_reload_overwrites_folder() {
    let browser = TestBrowser::new(deep()).await;
    let session = &browser.session;
    session.expand_folder(&id("a")).await.unwrap();
    session.toggle_node(&id("a1")).await;

    browser
        .lister
        .set_children(Some(id("a")), vec![Node::file("a2", "/a/a2.txt")]);
    session.fetch(&FolderKey::Folder(id("a"))).await.unwrap();

    let children = session
        .cached_children(&FolderKey::Folder(id("a")))
        .await
        .unwrap();
    assert_eq!(ids(&children), vec!["a2"]);
    assert!(session.selected_ids().await.is_empty());
}

#[tokio::test]
async fn test_pagination_is_followed_and_guarded() {
    let many: Vec<Node> = (0..25)
        .map(|i| Node::file(format!("n{i:02}"), format!("/big/n{i:02}")))
        .collect();
    let fixture = FixtureTree::new()
        .with_root(vec![Node::folder("big", "/big")])
        .with_children("big", many);

    let paged = BrowserConfig {
        page_size: 10,
        ..Default::default()
    };
    let browser = TestBrowser::with_config(fixture.clone(), paged).await;
    browser.session.open_folder(&id("big"), "big").await.unwrap();
    assert_eq!(browser.session.displayed().await.len(), 25);
    assert_eq!(browser.calls("big"), 3);

    let guarded = BrowserConfig {
        page_size: 10,
        max_pages: 2,
        ..Default::default()
    };
    let browser = TestBrowser::with_config(fixture, guarded).await;
    let err = browser
        .session
        .open_folder(&id("big"), "big")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(!browser.session.is_known(&FolderKey::Folder(id("big"))).await);
}

#[tokio::test]
async fn test_browse_local_directory() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("docs/reports")).unwrap();
    std::fs::write(tmp.path().join("docs/reports/q1-report.pdf"), b"pdf").unwrap();
    std::fs::write(tmp.path().join("docs/readme.txt"), b"hello").unwrap();

    let lister = LocalDirLister::new(tmp.path().to_str().unwrap())
        .await
        .unwrap();
    let session = BrowserSession::new(
        Arc::new(lister),
        &BrowserConfig::default(),
        ConnectionId::new("local"),
    );
    session.load_root().await.unwrap();
    session.open_folder(&id("docs"), "docs").await.unwrap();
    assert_eq!(ids(&session.displayed().await), vec!["docs/readme.txt", "docs/reports"]);

    session.toggle_folder(&id("docs/reports")).await;
    session.settle().await;
    assert!(
        session
            .selected_ids()
            .await
            .contains(&id("docs/reports/q1-report.pdf"))
    );
}
