//! Tree browsing configuration.

use serde::{Deserialize, Serialize};

use crate::types::sorting::{SortDirection, SortKey};

/// Settings for folder listing and the default view ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// `limit` sent with every listing request.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Maximum number of cursor pages followed for a single folder.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Initial sort key for the visible list.
    #[serde(default)]
    pub default_sort_key: SortKey,
    /// Initial sort direction for the visible list.
    #[serde(default)]
    pub default_sort_direction: SortDirection,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            default_sort_key: SortKey::default(),
            default_sort_direction: SortDirection::default(),
        }
    }
}

fn default_page_size() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    1000
}
