//! A file or folder entry in the remote tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::NodeId;
use super::status::IndexStatus;

/// Whether a node is a leaf or can hold children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A leaf document.
    File,
    /// A container whose children are listed on demand.
    #[serde(alias = "folder")]
    Directory,
}

impl NodeKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

/// One entry returned by the listing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Globally unique id.
    pub id: NodeId,
    /// File or folder.
    pub kind: NodeKind,
    /// Display name; may be empty when only `path` is known.
    #[serde(default)]
    pub name: String,
    /// Slash-separated path inside the connection.
    #[serde(default)]
    pub path: String,
    /// Size in bytes (files only).
    #[serde(default)]
    pub size: Option<u64>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Knowledge-base index status.
    #[serde(default)]
    pub index_status: IndexStatus,
}

impl Node {
    /// Create a file node with no timestamps.
    pub fn file(id: impl Into<NodeId>, path: impl Into<String>) -> Self {
        Self::bare(id.into(), NodeKind::File, path.into(), IndexStatus::NotIndexed)
    }

    /// Create a folder node with no timestamps.
    pub fn folder(id: impl Into<NodeId>, path: impl Into<String>) -> Self {
        Self::bare(id.into(), NodeKind::Directory, path.into(), IndexStatus::NoStatus)
    }

    fn bare(id: NodeId, kind: NodeKind, path: String, index_status: IndexStatus) -> Self {
        let name = last_segment(&path).to_string();
        Self {
            id,
            kind,
            name,
            path,
            size: None,
            created_at: None,
            updated_at: None,
            index_status,
        }
    }

    /// Whether this node can hold children.
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// The name to show, falling back to the last path segment.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            last_segment(&self.path)
        } else {
            &self.name
        }
    }

    /// Timestamp used for date ordering: updated, then created.
    pub fn modified_or_created(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }

    /// Builder-style setter for `updated_at`.
    pub fn with_updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Builder-style setter for `created_at`.
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Builder-style setter for `index_status`.
    pub fn with_status(mut self, status: IndexStatus) -> Self {
        self.index_status = status;
        self
    }

    /// Builder-style setter for `size`.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}
