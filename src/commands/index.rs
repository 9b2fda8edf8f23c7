//! Bulk index command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use filepick_core::config::AppConfig;
use filepick_core::error::AppError;
use filepick_core::types::NodeId;

use crate::output::{self, OutputFormat};

/// Arguments for the index command
#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Resource IDs to select (folders select their whole subtree)
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Override the configured chunk size
    #[arg(long)]
    pub chunk_size: Option<u32>,
}

/// Per-node index result row
#[derive(Debug, Serialize, Tabled)]
struct StatusRow {
    /// Node ID
    id: String,
    /// Final status
    status: String,
}

/// Execute the index command
pub async fn execute(args: &IndexArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let session = super::open_session(config).await?;
    let workflow = super::index_workflow(config);

    for raw in &args.ids {
        let id = NodeId::new(raw.clone());
        if session.find(&id).await.is_none() {
            output::print_warning(&format!("{} is not in a loaded folder, selecting it as is", raw));
        }
        session.toggle_node(&id).await;
    }
    session.settle().await;
    super::report_load_errors(&session).await;

    let mut options = workflow.default_options().clone();
    if let Some(chunk_size) = args.chunk_size {
        options.chunk_size = chunk_size;
    }

    let selected = session.total_selected_count().await;
    tracing::info!(selected, "Starting bulk index");
    let outcome = filepick_index::index_selection(&session, &workflow, &options).await?;

    let mut rows: Vec<StatusRow> = outcome
        .statuses
        .iter()
        .map(|(id, status)| StatusRow {
            id: id.to_string(),
            status: status.to_string(),
        })
        .collect();
    rows.sort_by(|a, b| a.id.cmp(&b.id));
    output::print_list(&rows, format);

    let failed = outcome.failed();
    if failed.is_empty() {
        output::print_success(&format!(
            "Indexed {} resources into {}",
            rows.len(),
            outcome.index_id
        ));
    } else {
        output::print_warning(&format!("{} resources failed to index", failed.len()));
    }
    Ok(())
}
