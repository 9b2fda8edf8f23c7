//! Indexing workflow configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the bulk-index status poll loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    /// Fixed delay between two status polls, in milliseconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Number of polls before the batch is declared timed out.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
    /// Options sent with every `create_index` call.
    #[serde(default)]
    pub default_options: IndexingOptions,
}

impl IndexingConfig {
    /// The poll delay as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
            default_options: IndexingOptions::default(),
        }
    }
}

/// Options forwarded verbatim to the indexing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingOptions {
    /// Target chunk size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
    /// Overlap between consecutive chunks in characters.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: u32,
    /// Whether embeddings are generated.
    #[serde(default = "default_true")]
    pub embed: bool,
    /// Service-specific parameters.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl Default for IndexingOptions {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            embed: true,
            parameters: BTreeMap::new(),
        }
    }
}

fn default_poll_interval() -> u64 {
    2000
}

fn default_max_poll_attempts() -> u32 {
    30
}

fn default_chunk_size() -> u32 {
    1500
}

fn default_chunk_overlap() -> u32 {
    500
}

fn default_true() -> bool {
    true
}
