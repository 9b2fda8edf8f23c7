//! Shared fixtures for session integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use filepick_core::config::browser::BrowserConfig;
use filepick_core::types::{ConnectionId, Node, NodeId};
use filepick_source::memory::{FixtureTree, MemoryLister};
use filepick_tree::BrowserSession;

/// A session over an in-memory lister, plus the lister for call counts
/// and fault injection.
pub struct TestBrowser {
    pub session: BrowserSession,
    pub lister: MemoryLister,
}

impl TestBrowser {
    /// Browse `fixture` with default settings; the root is loaded.
    pub async fn new(fixture: FixtureTree) -> Self {
        Self::with_config(fixture, BrowserConfig::default()).await
    }

    /// Browse `fixture` with `config`; the root is loaded.
    pub async fn with_config(fixture: FixtureTree, config: BrowserConfig) -> Self {
        let lister = MemoryLister::new(fixture);
        let session = BrowserSession::new(
            Arc::new(lister.clone()),
            &config,
            ConnectionId::new("test-connection"),
        );
        session.load_root().await.expect("root listing");
        Self { session, lister }
    }

    /// Number of listing calls made for `folder`.
    pub fn calls(&self, folder: &str) -> u32 {
        self.lister.call_count(Some(&NodeId::new(folder)))
    }
}

pub fn id(raw: &str) -> NodeId {
    NodeId::new(raw)
}

pub fn ids(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

/// root: [FolderA/, File1.pdf]; FolderA: [File2.txt]
pub fn scenario() -> FixtureTree {
    FixtureTree::new()
        .with_root(vec![
            Node::folder("folder-a", "/FolderA"),
            Node::file("file-1", "/File1.pdf"),
        ])
        .with_children("folder-a", vec![Node::file("file-2", "/FolderA/File2.txt")])
}

/// root: [a/, top.txt]; a: [b/, a1.txt]; b: [c/, b1.txt]; c: [c1-report.pdf]
pub fn deep() -> FixtureTree {
    FixtureTree::new()
        .with_root(vec![Node::folder("a", "/a"), Node::file("top", "/top.txt")])
        .with_children("a", vec![Node::folder("b", "/a/b"), Node::file("a1", "/a/a1.txt")])
        .with_children("b", vec![Node::folder("c", "/a/b/c"), Node::file("b1", "/a/b/b1.txt")])
        .with_children("c", vec![Node::file("c1", "/a/b/c/c1-report.pdf")])
}
