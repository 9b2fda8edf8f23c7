//! Simulated indexing service.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use filepick_core::config::indexing::IndexingOptions;
use filepick_core::error::AppError;
use filepick_core::result::AppResult;
use filepick_core::traits::indexing::{IndexHandle, IndexingService};
use filepick_core::types::{ConnectionId, IndexId, IndexStatus, NodeId};

/// State of one simulated index.
#[derive(Debug, Clone)]
struct MemoryIndex {
    /// Resources in the index.
    nodes: Vec<NodeId>,
    /// Whether `trigger_sync` has been called.
    synced: bool,
    /// Number of polls served since the sync started.
    polls: u32,
}

/// In-memory indexing service.
///
/// After `trigger_sync`, every node reports `pending` until
/// `polls_to_complete` polls have been served, then `indexed` (or `error`
/// for nodes registered with [`MemoryIndexer::fail_node`]). Nodes marked
/// stuck never leave `pending`.
#[derive(Debug, Clone)]
pub struct MemoryIndexer {
    indexes: Arc<DashMap<IndexId, MemoryIndex>>,
    polls_to_complete: u32,
    failing: Arc<DashMap<NodeId, ()>>,
    stuck: Arc<DashMap<NodeId, ()>>,
    reject_removal: Arc<DashMap<NodeId, ()>>,
}

impl MemoryIndexer {
    /// Create an indexer that completes after `polls_to_complete` polls.
    pub fn new(polls_to_complete: u32) -> Self {
        Self {
            indexes: Arc::new(DashMap::new()),
            polls_to_complete,
            failing: Arc::new(DashMap::new()),
            stuck: Arc::new(DashMap::new()),
            reject_removal: Arc::new(DashMap::new()),
        }
    }

    /// `node` finishes in `error` instead of `indexed`.
    pub fn fail_node(&self, node: impl Into<NodeId>) {
        self.failing.insert(node.into(), ());
    }

    /// `node` stays `pending` forever.
    pub fn stick_node(&self, node: impl Into<NodeId>) {
        self.stuck.insert(node.into(), ());
    }

    /// `remove_resource` fails for `node`.
    pub fn reject_removal_of(&self, node: impl Into<NodeId>) {
        self.reject_removal.insert(node.into(), ());
    }

    /// Resources currently held by `index_id`.
    pub fn indexed_nodes(&self, index_id: &IndexId) -> Vec<NodeId> {
        self.indexes
            .get(index_id)
            .map(|index| index.nodes.clone())
            .unwrap_or_default()
    }

    fn status_of(&self, node: &NodeId, done: bool) -> IndexStatus {
        if self.stuck.contains_key(node) || !done {
            IndexStatus::Pending
        } else if self.failing.contains_key(node) {
            IndexStatus::Error
        } else {
            IndexStatus::Indexed
        }
    }
}

impl Default for MemoryIndexer {
    fn default() -> Self {
        Self::new(1)
    }
}

#[async_trait]
impl IndexingService for MemoryIndexer {
    async fn create_index(
        &self,
        connection: &ConnectionId,
        node_ids: &[NodeId],
        options: &IndexingOptions,
    ) -> AppResult<IndexHandle> {
        if node_ids.is_empty() {
            return Err(AppError::validation("Cannot create an index with no resources"));
        }
        let unique: HashSet<&NodeId> = node_ids.iter().collect();
        if unique.len() != node_ids.len() {
            return Err(AppError::validation("Duplicate resource ids in index request"));
        }

        let index_id = IndexId::new(uuid::Uuid::new_v4().to_string());
        self.indexes.insert(
            index_id.clone(),
            MemoryIndex {
                nodes: node_ids.to_vec(),
                synced: false,
                polls: 0,
            },
        );
        debug!(
            connection = %connection,
            index_id = %index_id,
            nodes = node_ids.len(),
            chunk_size = options.chunk_size,
            "Created in-memory index"
        );
        Ok(IndexHandle { index_id })
    }

    async fn trigger_sync(&self, index_id: &IndexId) -> AppResult<()> {
        let mut index = self
            .indexes
            .get_mut(index_id)
            .ok_or_else(|| AppError::not_found(format!("Index not found: {index_id}")))?;
        index.synced = true;
        index.polls = 0;
        Ok(())
    }

    async fn poll_status(&self, index_id: &IndexId) -> AppResult<HashMap<NodeId, IndexStatus>> {
        let mut index = self
            .indexes
            .get_mut(index_id)
            .ok_or_else(|| AppError::not_found(format!("Index not found: {index_id}")))?;
        if !index.synced {
            return Ok(HashMap::new());
        }
        index.polls += 1;
        let done = index.polls >= self.polls_to_complete;
        Ok(index
            .nodes
            .iter()
            .map(|node| (node.clone(), self.status_of(node, done)))
            .collect())
    }

    async fn remove_resource(&self, index_id: &IndexId, node_id: &NodeId) -> AppResult<()> {
        if self.reject_removal.contains_key(node_id) {
            return Err(AppError::external(format!(
                "Indexing service refused to remove {node_id}"
            )));
        }
        let mut index = self
            .indexes
            .get_mut(index_id)
            .ok_or_else(|| AppError::not_found(format!("Index not found: {index_id}")))?;
        let before = index.nodes.len();
        index.nodes.retain(|n| n != node_id);
        if index.nodes.len() == before {
            return Err(AppError::not_found(format!(
                "Resource {node_id} is not part of index {index_id}"
            )));
        }
        Ok(())
    }
}
