//! Fixture-backed listing provider using dashmap.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use filepick_core::error::AppError;
use filepick_core::result::AppResult;
use filepick_core::traits::listing::ResourceLister;
use filepick_core::types::{ConnectionId, ListPage, ListRequest, Node, NodeId};

/// Serialized shape of a fixture file.
///
/// `children` maps a folder id to its direct children. A folder that
/// appears in some listing but has no `children` entry lists as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureTree {
    /// Connection root entries.
    #[serde(default)]
    pub root: Vec<Node>,
    /// Folder id to direct children.
    #[serde(default)]
    pub children: HashMap<NodeId, Vec<Node>>,
}

impl FixtureTree {
    /// Create an empty fixture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root listing.
    pub fn with_root(mut self, nodes: Vec<Node>) -> Self {
        self.root = nodes;
        self
    }

    /// Set the children of one folder.
    pub fn with_children(mut self, folder: impl Into<NodeId>, nodes: Vec<Node>) -> Self {
        self.children.insert(folder.into(), nodes);
        self
    }
}

/// Folder key: `None` is the connection root.
type FolderSlot = Option<NodeId>;

/// In-memory listing provider.
///
/// Besides serving a fixture it can inject failures and per-folder delays,
/// and it counts calls per folder so callers can check that duplicate
/// fetches were suppressed.
#[derive(Debug, Clone, Default)]
pub struct MemoryLister {
    /// Folder listings.
    folders: Arc<DashMap<FolderSlot, Vec<Node>>>,
    /// Remaining injected failures per folder.
    failures: Arc<DashMap<FolderSlot, u32>>,
    /// Artificial latency per folder.
    delays: Arc<DashMap<FolderSlot, Duration>>,
    /// Number of `list_children` calls per folder.
    calls: Arc<DashMap<FolderSlot, u32>>,
}

impl MemoryLister {
    /// Create a lister serving `fixture`.
    pub fn new(fixture: FixtureTree) -> Self {
        let lister = Self::default();
        lister.folders.insert(None, fixture.root);
        for (folder, nodes) in fixture.children {
            lister.folders.insert(Some(folder), nodes);
        }
        lister
    }

    /// Load a JSON fixture from disk.
    pub async fn from_fixture_file(path: &str) -> AppResult<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        let fixture: FixtureTree = serde_json::from_str(&raw)?;
        Ok(Self::new(fixture))
    }

    /// Replace the listing of one folder (`None` for root).
    pub fn set_children(&self, folder: Option<NodeId>, nodes: Vec<Node>) {
        self.folders.insert(folder, nodes);
    }

    /// Make the next `times` listings of `folder` fail.
    pub fn fail_next(&self, folder: Option<NodeId>, times: u32) {
        self.failures.insert(folder, times);
    }

    /// Delay every listing of `folder` by `delay`.
    pub fn set_delay(&self, folder: Option<NodeId>, delay: Duration) {
        self.delays.insert(folder, delay);
    }

    /// How many times `folder` has been listed.
    pub fn call_count(&self, folder: Option<&NodeId>) -> u32 {
        self.calls
            .get(&folder.cloned())
            .map(|count| *count)
            .unwrap_or(0)
    }

    fn is_known_folder(&self, id: &NodeId) -> bool {
        self.folders.iter().any(|entry| {
            entry
                .value()
                .iter()
                .any(|node| &node.id == id && node.is_folder())
        })
    }

    fn take_failure(&self, slot: &FolderSlot) -> bool {
        match self.failures.get_mut(slot) {
            Some(mut remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl ResourceLister for MemoryLister {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn list_children(
        &self,
        _connection: &ConnectionId,
        request: &ListRequest,
    ) -> AppResult<ListPage> {
        let slot = request.resource_id.clone();
        *self.calls.entry(slot.clone()).or_insert(0) += 1;

        let delay = self.delays.get(&slot).map(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.take_failure(&slot) {
            return Err(AppError::external(format!(
                "Injected listing failure for {}",
                slot.as_ref().map(NodeId::as_str).unwrap_or("root")
            )));
        }

        let nodes = match self.folders.get(&slot) {
            Some(nodes) => nodes.clone(),
            None => match &slot {
                Some(id) if self.is_known_folder(id) => Vec::new(),
                Some(id) => return Err(AppError::not_found(format!("Folder not found: {id}"))),
                None => Vec::new(),
            },
        };

        let offset = match request.cursor.as_deref() {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| AppError::validation(format!("Invalid cursor: {cursor}")))?,
            None => 0,
        };
        let limit = request.limit.map(|l| l as usize).unwrap_or(nodes.len());
        let end = offset.saturating_add(limit).min(nodes.len());
        let data = nodes.get(offset..end).map(<[Node]>::to_vec).unwrap_or_default();
        let next_cursor = (end < nodes.len()).then(|| end.to_string());

        debug!(folder = ?slot, count = data.len(), "Served fixture listing");
        Ok(ListPage { data, next_cursor })
    }
}
