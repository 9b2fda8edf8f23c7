//! Cursor pagination types for the listing service.

use serde::{Deserialize, Serialize};

use super::id::NodeId;
use super::node::Node;

/// Parameters of one `list_children` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    /// Folder to list; `None` lists the connection root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<NodeId>,
    /// Continuation cursor from the previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Maximum entries per page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListRequest {
    /// First page of `resource_id` (root when `None`).
    pub fn first(resource_id: Option<NodeId>, limit: u32) -> Self {
        Self {
            resource_id,
            cursor: None,
            limit: Some(limit),
        }
    }

    /// The same request continued at `cursor`.
    pub fn next(&self, cursor: String) -> Self {
        Self {
            cursor: Some(cursor),
            ..self.clone()
        }
    }
}

/// One page of direct children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    /// Entries on this page.
    pub data: Vec<Node>,
    /// Cursor of the following page, if any.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl ListPage {
    /// A final page with no continuation.
    pub fn last(data: Vec<Node>) -> Self {
        Self {
            data,
            next_cursor: None,
        }
    }
}
