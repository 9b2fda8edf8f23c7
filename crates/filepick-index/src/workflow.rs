//! Index creation and bounded status polling.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::time;

use filepick_core::config::indexing::{IndexingConfig, IndexingOptions};
use filepick_core::result::AppResult;
use filepick_core::traits::indexing::IndexingService;
use filepick_core::types::{ConnectionId, IndexId, IndexStatus, NodeId};

/// Final state of one polled index batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexOutcome {
    /// The index that was polled.
    pub index_id: IndexId,
    /// Last known status per node in the batch.
    pub statuses: HashMap<NodeId, IndexStatus>,
    /// Whether the poll attempts ran out before every node settled.
    pub timed_out: bool,
    /// Polls performed.
    pub attempts: u32,
}

impl IndexOutcome {
    /// Nodes that ended in `error`, sorted.
    pub fn failed(&self) -> Vec<NodeId> {
        let mut failed: Vec<NodeId> = self
            .statuses
            .iter()
            .filter(|(_, status)| **status == IndexStatus::Error)
            .map(|(id, _)| id.clone())
            .collect();
        failed.sort();
        failed
    }
}

/// Drives an [`IndexingService`] with the configured poll policy.
#[derive(Debug, Clone)]
pub struct IndexWorkflow {
    /// Remote indexing service
    service: Arc<dyn IndexingService>,
    /// Poll interval, attempt bound and default options
    config: IndexingConfig,
}

impl IndexWorkflow {
    /// Create a new workflow
    pub fn new(service: Arc<dyn IndexingService>, config: IndexingConfig) -> Self {
        Self { service, config }
    }

    /// Options used when the caller has none of its own
    pub fn default_options(&self) -> &IndexingOptions {
        &self.config.default_options
    }

    /// Create an index over `node_ids`
    pub async fn create(
        &self,
        connection: &ConnectionId,
        node_ids: &[NodeId],
        options: &IndexingOptions,
    ) -> AppResult<IndexId> {
        let handle = self
            .service
            .create_index(connection, node_ids, options)
            .await?;
        tracing::info!(
            index_id = %handle.index_id,
            nodes = node_ids.len(),
            "Index created"
        );
        Ok(handle.index_id)
    }

    /// Start synchronizing an index
    pub async fn sync(&self, index_id: &IndexId) -> AppResult<()> {
        self.service.trigger_sync(index_id).await
    }

    /// Remove one resource from an index
    pub async fn remove(&self, index_id: &IndexId, node_id: &NodeId) -> AppResult<()> {
        self.service.remove_resource(index_id, node_id).await
    }

    /// Poll until every node in `nodes` is `indexed` or `error`, or the
    /// attempts run out.
    ///
    /// Each attempt waits `poll_interval` first. A failed poll uses up its
    /// attempt. After every successful poll `on_poll` receives the statuses
    /// it reported for the batch. When attempts run out, every node in the
    /// batch is marked `error`.
    pub async fn wait_with<F, Fut>(
        &self,
        index_id: &IndexId,
        nodes: &[NodeId],
        mut on_poll: F,
    ) -> IndexOutcome
    where
        F: FnMut(HashMap<NodeId, IndexStatus>) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut statuses: HashMap<NodeId, IndexStatus> = nodes
            .iter()
            .map(|id| (id.clone(), IndexStatus::Pending))
            .collect();
        let max_attempts = self.config.max_poll_attempts;

        for attempt in 1..=max_attempts {
            time::sleep(self.config.poll_interval()).await;

            match self.service.poll_status(index_id).await {
                Ok(report) => {
                    let update: HashMap<NodeId, IndexStatus> = report
                        .into_iter()
                        .filter(|(id, _)| statuses.contains_key(id))
                        .collect();
                    statuses.extend(update.iter().map(|(id, s)| (id.clone(), *s)));
                    on_poll(update).await;
                }
                Err(e) => {
                    tracing::warn!(
                        index_id = %index_id,
                        attempt,
                        error = %e,
                        "Status poll failed"
                    );
                }
            }

            if statuses.values().all(IndexStatus::is_terminal) {
                tracing::debug!(index_id = %index_id, attempt, "Index batch settled");
                return IndexOutcome {
                    index_id: index_id.clone(),
                    statuses,
                    timed_out: false,
                    attempts: attempt,
                };
            }
        }

        tracing::warn!(
            index_id = %index_id,
            attempts = max_attempts,
            nodes = statuses.len(),
            "Index polling exhausted, marking batch as failed"
        );
        for status in statuses.values_mut() {
            *status = IndexStatus::Error;
        }
        IndexOutcome {
            index_id: index_id.clone(),
            statuses,
            timed_out: true,
            attempts: max_attempts,
        }
    }

    /// [`IndexWorkflow::wait_with`] without progress callbacks
    pub async fn wait(&self, index_id: &IndexId, nodes: &[NodeId]) -> IndexOutcome {
        self.wait_with(index_id, nodes, |_| async {}).await
    }
}
