//! CLI command definitions and dispatch.

pub mod browse;
pub mod index;
pub mod ls;
pub mod tree;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};

use filepick_core::config::AppConfig;
use filepick_core::error::AppError;
use filepick_core::types::{
    ConnectionId, IndexStatus, NodeFilter, SortDirection, SortKey, SortSpec, StatusFilter,
    TypeFilter,
};
use filepick_index::IndexWorkflow;
use filepick_source::memory::MemoryIndexer;
use filepick_tree::BrowserSession;

use crate::output::{self, NodeRow, OutputFormat};

/// FilePick — browse a file tree lazily and select files for indexing
#[derive(Debug, Parser)]
#[command(name = "filepick", version, about, long_about = None)]
pub struct Cli {
    /// Path to the base configuration file (extension optional)
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Configuration overlay to apply on top of the base file
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the folder tree, loading folders down to a depth
    Tree(tree::TreeArgs),
    /// List one folder, or search everything loaded so far
    Ls(ls::LsArgs),
    /// Interactive browsing shell over one session
    Browse,
    /// Select resources and run a bulk index
    Index(index::IndexArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Tree(args) => tree::execute(args, &config, self.format).await,
            Commands::Ls(args) => ls::execute(args, &config, self.format).await,
            Commands::Browse => browse::execute(&config, self.format).await,
            Commands::Index(args) => index::execute(args, &config, self.format).await,
        }
    }
}

/// Node kind restriction on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Files and folders
    All,
    /// Files only
    File,
    /// Folders only
    Folder,
}

impl From<KindArg> for TypeFilter {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::All => TypeFilter::All,
            KindArg::File => TypeFilter::File,
            KindArg::Folder => TypeFilter::Folder,
        }
    }
}

/// Sort key on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// By name
    Name,
    /// By last modified
    Modified,
}

impl From<SortArg> for SortKey {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Name => SortKey::Name,
            SortArg::Modified => SortKey::Modified,
        }
    }
}

/// Shared filter and sort flags
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Case-insensitive name search across every loaded folder
    #[arg(short, long)]
    pub query: Option<String>,

    /// Restrict by node kind
    #[arg(short = 't', long = "type", value_enum, default_value = "all")]
    pub kind: KindArg,

    /// Restrict by index status (indexed, pending, error, deindexed,
    /// not-indexed, no-status)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Sort key (defaults to the configured one)
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

impl FilterArgs {
    /// Build a filter, falling back to `default_sort` for the sort key
    pub fn to_filter(&self, default_sort: SortSpec) -> Result<NodeFilter, AppError> {
        let index_status = match &self.status {
            Some(raw) => StatusFilter::Only(raw.parse::<IndexStatus>()?),
            None => StatusFilter::All,
        };
        let key = self.sort.map(SortKey::from).unwrap_or(default_sort.key);
        let direction = if self.desc {
            SortDirection::Desc
        } else if self.sort.is_some() {
            SortDirection::Asc
        } else {
            default_sort.direction
        };
        Ok(NodeFilter {
            query: self.query.clone().unwrap_or_default(),
            node_type: self.kind.into(),
            index_status,
            sort: SortSpec::new(key, direction),
        })
    }
}

/// Helper: build the configured lister and open a session on its root
pub async fn open_session(config: &AppConfig) -> Result<BrowserSession, AppError> {
    let lister = filepick_source::build_lister(&config.source).await?;
    let session = BrowserSession::new(
        lister,
        &config.browser,
        ConnectionId::new(config.source.connection_id.clone()),
    );
    session.load_root().await?;
    Ok(session)
}

/// Helper: an indexing workflow backed by the in-memory indexing service
pub fn index_workflow(config: &AppConfig) -> IndexWorkflow {
    IndexWorkflow::new(Arc::new(MemoryIndexer::default()), config.indexing.clone())
}

/// Helper: configured default sort
pub fn default_sort(config: &AppConfig) -> SortSpec {
    SortSpec::new(
        config.browser.default_sort_key,
        config.browser.default_sort_direction,
    )
}

/// Helper: print the session's visible list with checkbox marks
pub async fn print_visible(session: &BrowserSession, format: OutputFormat) {
    let nodes = session.visible_nodes().await;
    let mut rows = Vec::with_capacity(nodes.len());
    for node in &nodes {
        rows.push(NodeRow::new(node, session.tri_state(&node.id).await));
    }
    output::print_list(&rows, format);
}

/// Helper: report background load failures collected by the session
pub async fn report_load_errors(session: &BrowserSession) {
    for (folder, err) in session.take_load_errors().await {
        output::print_warning(&format!("Loading {} failed: {}", folder, err));
    }
}
