//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use filepick_core::types::Node;
use filepick_tree::TriState;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One node as shown by `ls` and the browse shell
#[derive(Debug, Serialize, Tabled)]
pub struct NodeRow {
    /// Checkbox
    #[tabled(rename = "")]
    pub mark: String,
    /// Node ID
    pub id: String,
    /// Display name
    pub name: String,
    /// file / directory
    pub kind: String,
    /// Index status
    pub status: String,
    /// Last modified
    pub modified: String,
}

impl NodeRow {
    /// Build a row from a node and its checkbox state
    pub fn new(node: &Node, state: TriState) -> Self {
        let mark = match state {
            TriState::Full => "[x]",
            TriState::Partial => "[-]",
            TriState::None => "[ ]",
        };
        let name = if node.is_folder() {
            format!("{}/", node.display_name())
        } else {
            node.display_name().to_string()
        };
        Self {
            mark: mark.to_string(),
            id: node.id.to_string(),
            name,
            kind: node.kind.as_str().to_string(),
            status: node.index_status.to_string(),
            modified: node
                .modified_or_created()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                let table = Table::new(items).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}
