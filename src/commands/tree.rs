//! Tree printing command.

use std::collections::HashSet;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use filepick_core::config::AppConfig;
use filepick_core::error::AppError;
use filepick_core::types::Node;
use filepick_tree::FolderKey;

use crate::output::{self, OutputFormat};

/// Arguments for the tree command
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// How many folder levels below the root to load
    #[arg(short, long, default_value = "2")]
    pub depth: u32,
}

/// One line of the tree in JSON output
#[derive(Debug, Serialize, Tabled)]
struct TreeRow {
    /// Nesting level, 0 for root entries
    depth: u32,
    /// Node ID
    id: String,
    /// Display name
    name: String,
    /// file / directory
    kind: String,
    /// Index status
    status: String,
}

/// Execute the tree command
pub async fn execute(args: &TreeArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let session = super::open_session(config).await?;

    let mut frontier: Vec<Node> = session
        .cached_children(&FolderKey::Root)
        .await
        .unwrap_or_default();
    for level in 0..args.depth {
        let mut next = Vec::new();
        for folder in frontier.iter().filter(|n| n.is_folder()) {
            if let Err(e) = session.expand_folder(&folder.id).await {
                output::print_warning(&format!("Could not load {}: {}", folder.path, e));
                continue;
            }
            if let Some(children) = session
                .cached_children(&FolderKey::Folder(folder.id.clone()))
                .await
            {
                next.extend(children);
            }
        }
        tracing::debug!(level, loaded = next.len(), "Tree level loaded");
        frontier = next;
    }

    // Depth-first walk over what is now cached.
    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    let mut stack: Vec<(Node, u32)> = session
        .cached_children(&FolderKey::Root)
        .await
        .unwrap_or_default()
        .into_iter()
        .rev()
        .map(|n| (n, 0))
        .collect();
    while let Some((node, depth)) = stack.pop() {
        if !seen.insert(node.id.clone()) {
            continue;
        }
        if node.is_folder() {
            if let Some(children) = session
                .cached_children(&FolderKey::Folder(node.id.clone()))
                .await
            {
                stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
            }
        }
        rows.push(TreeRow {
            depth,
            id: node.id.to_string(),
            name: node.display_name().to_string(),
            kind: node.kind.as_str().to_string(),
            status: node.index_status.to_string(),
        });
    }

    match format {
        OutputFormat::Json => output::print_list(&rows, format),
        OutputFormat::Table => {
            println!("/");
            for row in &rows {
                let indent = "  ".repeat(row.depth as usize + 1);
                let suffix = if row.kind == "directory" { "/" } else { "" };
                println!("{}├── {}{}  [{}]", indent, row.name, suffix, row.status);
            }
        }
    }

    Ok(())
}
