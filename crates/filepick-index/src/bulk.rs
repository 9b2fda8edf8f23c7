//! Bulk operations over a session's selection.

use std::collections::HashMap;

use futures::future::join_all;
use serde::Serialize;

use filepick_core::config::indexing::IndexingOptions;
use filepick_core::error::AppError;
use filepick_core::result::AppResult;
use filepick_core::types::{IndexStatus, NodeId};
use filepick_tree::BrowserSession;

use crate::workflow::{IndexOutcome, IndexWorkflow};

/// Per-item outcome of a bulk call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkReport {
    /// Items processed successfully.
    pub succeeded: Vec<NodeId>,
    /// Items that failed, with the error message.
    pub failed: Vec<(NodeId, String)>,
}

impl BulkReport {
    /// Whether no item failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// One error summarizing every failed item, if any failed.
    pub fn aggregate_error(&self) -> Option<AppError> {
        if self.failed.is_empty() {
            return None;
        }
        let total = self.succeeded.len() + self.failed.len();
        let names: Vec<&str> = self.failed.iter().map(|(id, _)| id.as_str()).collect();
        Some(AppError::external(format!(
            "{} of {total} items failed: {}",
            self.failed.len(),
            names.join(", ")
        )))
    }
}

/// Index every selected node as one batch.
///
/// Nodes show `pending` as soon as the index exists and are updated after
/// every poll. On success the selection is cleared and the index becomes
/// the session's active index. When polling runs out, the whole batch is
/// marked `error` and a timeout error is returned; the selection is kept
/// so the user can retry.
pub async fn index_selection(
    session: &BrowserSession,
    workflow: &IndexWorkflow,
    options: &IndexingOptions,
) -> AppResult<IndexOutcome> {
    let node_ids = session.selected_ids().await;
    if node_ids.is_empty() {
        return Err(AppError::validation("Nothing selected to index"));
    }
    let connection = session.connection().await;

    let index_id = workflow.create(&connection, &node_ids, options).await?;
    let pending: HashMap<NodeId, IndexStatus> = node_ids
        .iter()
        .map(|id| (id.clone(), IndexStatus::Pending))
        .collect();
    session.apply_index_statuses(&pending).await;
    workflow.sync(&index_id).await?;

    let outcome = workflow
        .wait_with(&index_id, &node_ids, |update| async move {
            session.apply_index_statuses(&update).await;
        })
        .await;
    session.apply_index_statuses(&outcome.statuses).await;

    if outcome.timed_out {
        return Err(AppError::timeout(format!(
            "Indexing {} items did not finish after {} polls",
            node_ids.len(),
            outcome.attempts
        )));
    }

    session.clear_selection().await;
    session.set_active_index(Some(index_id.clone())).await;
    tracing::info!(
        index_id = %index_id,
        nodes = node_ids.len(),
        failed = outcome.failed().len(),
        "Bulk index finished"
    );
    Ok(outcome)
}

/// Remove every selected node from the active index, one call per node,
/// all in flight at once.
///
/// A failed item does not stop the others. Removed nodes become
/// `deindexed`; the selection is cleared only when every item succeeded.
pub async fn remove_selection(
    session: &BrowserSession,
    workflow: &IndexWorkflow,
) -> AppResult<BulkReport> {
    let Some(index_id) = session.active_index().await else {
        return Err(AppError::validation("No active index to remove from"));
    };
    let node_ids = session.selected_ids().await;
    if node_ids.is_empty() {
        return Err(AppError::validation("Nothing selected to remove"));
    }

    let index_id = &index_id;
    let results = join_all(node_ids.iter().map(|id| async move {
        (id.clone(), workflow.remove(index_id, id).await)
    }))
    .await;

    let mut report = BulkReport::default();
    for (id, result) in results {
        match result {
            Ok(()) => report.succeeded.push(id),
            Err(e) => {
                tracing::warn!(node = %id, error = %e, "Remove from index failed");
                report.failed.push((id, e.message));
            }
        }
    }

    let deindexed: HashMap<NodeId, IndexStatus> = report
        .succeeded
        .iter()
        .map(|id| (id.clone(), IndexStatus::Deindexed))
        .collect();
    session.apply_index_statuses(&deindexed).await;

    if report.is_success() {
        session.clear_selection().await;
    }
    tracing::info!(
        index_id = %index_id,
        removed = report.succeeded.len(),
        failed = report.failed.len(),
        "Bulk remove finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_error_only_on_failure() {
        let ok = BulkReport {
            succeeded: vec![NodeId::new("a")],
            failed: Vec::new(),
        };
        assert!(ok.aggregate_error().is_none());

        let partial = BulkReport {
            succeeded: vec![NodeId::new("a")],
            failed: vec![(NodeId::new("b"), "refused".into())],
        };
        let err = partial.aggregate_error().unwrap();
        assert_eq!(err.kind, filepick_core::error::ErrorKind::ExternalService);
        assert!(err.message.contains("1 of 2"));
    }
}
