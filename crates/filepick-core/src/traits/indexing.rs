//! Knowledge-base indexing service trait.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::indexing::IndexingOptions;
use crate::result::AppResult;
use crate::types::id::{ConnectionId, IndexId, NodeId};
use crate::types::status::IndexStatus;

/// Handle returned by [`IndexingService::create_index`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexHandle {
    /// The new index.
    pub index_id: IndexId,
}

/// Remote service that indexes selected resources into a knowledge base.
#[async_trait]
pub trait IndexingService: Send + Sync + std::fmt::Debug + 'static {
    /// Create an index over `node_ids` on `connection`.
    async fn create_index(
        &self,
        connection: &ConnectionId,
        node_ids: &[NodeId],
        options: &IndexingOptions,
    ) -> AppResult<IndexHandle>;

    /// Start synchronizing the index with its sources.
    async fn trigger_sync(&self, index_id: &IndexId) -> AppResult<()>;

    /// Current per-node status of the index. Nodes absent from the map
    /// have not been reported on yet.
    async fn poll_status(&self, index_id: &IndexId) -> AppResult<HashMap<NodeId, IndexStatus>>;

    /// Remove one resource from the index.
    async fn remove_resource(&self, index_id: &IndexId, node_id: &NodeId) -> AppResult<()>;
}
