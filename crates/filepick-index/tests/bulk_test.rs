//! Integration tests for bulk index and bulk remove over a session.

use std::sync::Arc;

use filepick_core::config::browser::BrowserConfig;
use filepick_core::config::indexing::{IndexingConfig, IndexingOptions};
use filepick_core::error::ErrorKind;
use filepick_core::types::{ConnectionId, IndexStatus, Node, NodeId};
use filepick_index::{IndexWorkflow, index_selection, remove_selection};
use filepick_source::memory::{FixtureTree, MemoryIndexer, MemoryLister};
use filepick_tree::BrowserSession;

fn id(raw: &str) -> NodeId {
    NodeId::new(raw)
}

async fn session() -> BrowserSession {
    let lister = MemoryLister::new(
        FixtureTree::new()
            .with_root(vec![
                Node::folder("docs", "/docs"),
                Node::file("top", "/top.pdf"),
            ])
            .with_children(
                "docs",
                vec![Node::file("d1", "/docs/d1.txt"), Node::file("d2", "/docs/d2.txt")],
            ),
    );
    let session = BrowserSession::new(
        Arc::new(lister),
        &BrowserConfig::default(),
        ConnectionId::new("c"),
    );
    session.load_root().await.unwrap();
    session.expand_folder(&id("docs")).await.unwrap();
    session
}

fn workflow(indexer: &MemoryIndexer, max_poll_attempts: u32) -> IndexWorkflow {
    IndexWorkflow::new(
        Arc::new(indexer.clone()),
        IndexingConfig {
            poll_interval_ms: 500,
            max_poll_attempts,
            ..Default::default()
        },
    )
}

async fn status_of(session: &BrowserSession, node: &str) -> IndexStatus {
    session
        .snapshot()
        .await
        .cache
        .find(&id(node))
        .map(|n| n.index_status)
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_index_selection_success() {
    let session = session().await;
    let indexer = MemoryIndexer::new(2);
    let workflow = workflow(&indexer, 10);
    session.toggle_node(&id("d1")).await;
    session.toggle_node(&id("top")).await;

    let outcome = index_selection(&session, &workflow, &IndexingOptions::default())
        .await
        .unwrap();
    assert!(!outcome.timed_out);
    assert_eq!(status_of(&session, "d1").await, IndexStatus::Indexed);
    assert_eq!(status_of(&session, "top").await, IndexStatus::Indexed);
    assert_eq!(status_of(&session, "d2").await, IndexStatus::NotIndexed);
    assert!(session.selected_ids().await.is_empty());
    assert_eq!(session.active_index().await, Some(outcome.index_id.clone()));
    assert_eq!(indexer.indexed_nodes(&outcome.index_id), vec![id("d1"), id("top")]);
}

#[tokio::test(start_paused = true)]
async fn test_index_timeout_marks_batch_error() {
    let session = session().await;
    let indexer = MemoryIndexer::new(1);
    indexer.stick_node("d2");
    let workflow = workflow(&indexer, 3);
    session.toggle_folder(&id("docs")).await;

    let err = index_selection(&session, &workflow, &IndexingOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Timeout);
    for node in ["docs", "d1", "d2"] {
        assert_eq!(status_of(&session, node).await, IndexStatus::Error);
    }
    assert_eq!(session.selected_ids().await.len(), 3);
    assert!(session.active_index().await.is_none());
}

#[tokio::test]
async fn test_index_requires_selection() {
    let session = session().await;
    let workflow = workflow(&MemoryIndexer::default(), 3);
    let err = index_selection(&session, &workflow, &IndexingOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test(start_paused = true)]
async fn test_remove_partial_failure_keeps_successes() {
    let session = session().await;
    let indexer = MemoryIndexer::new(1);
    indexer.reject_removal_of("d2");
    let workflow = workflow(&indexer, 5);

    session.toggle_folder(&id("docs")).await;
    let outcome = index_selection(&session, &workflow, &IndexingOptions::default())
        .await
        .unwrap();

    session.toggle_node(&id("d1")).await;
    session.toggle_node(&id("d2")).await;
    let report = remove_selection(&session, &workflow).await.unwrap();

    // Selecting both children brought the folder back into the selection.
    assert_eq!(report.succeeded, vec![id("d1"), id("docs")]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, id("d2"));
    assert!(report.aggregate_error().is_some());
    assert_eq!(status_of(&session, "d1").await, IndexStatus::Deindexed);
    assert_eq!(status_of(&session, "d2").await, IndexStatus::Indexed);
    // Not every item succeeded: the selection stays.
    assert!(!session.selected_ids().await.is_empty());
    assert_eq!(indexer.indexed_nodes(&outcome.index_id), vec![id("d2")]);
}

#[tokio::test(start_paused = true)]
async fn test_remove_all_clears_selection() {
    let session = session().await;
    let indexer = MemoryIndexer::new(1);
    let workflow = workflow(&indexer, 5);

    session.toggle_node(&id("top")).await;
    index_selection(&session, &workflow, &IndexingOptions::default())
        .await
        .unwrap();
    session.toggle_node(&id("top")).await;
    let report = remove_selection(&session, &workflow).await.unwrap();

    assert!(report.is_success());
    assert!(session.selected_ids().await.is_empty());
    assert_eq!(status_of(&session, "top").await, IndexStatus::Deindexed);
}

#[tokio::test]
async fn test_remove_requires_active_index() {
    let session = session().await;
    let workflow = workflow(&MemoryIndexer::default(), 3);
    session.toggle_node(&id("top")).await;
    let err = remove_selection(&session, &workflow).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}
