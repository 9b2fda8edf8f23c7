//! Listing source configuration.

use serde::{Deserialize, Serialize};

/// Which listing provider backs a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Provider type: `"local"` or `"fixture"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Root directory for the local provider.
    #[serde(default = "default_root")]
    pub root: String,
    /// JSON fixture file for the fixture provider.
    #[serde(default)]
    pub fixture: Option<String>,
    /// Connection identifier sent with every listing call.
    #[serde(default = "default_connection")]
    pub connection_id: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            root: default_root(),
            fixture: None,
            connection_id: default_connection(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_root() -> String {
    ".".to_string()
}

fn default_connection() -> String {
    "local".to_string()
}
