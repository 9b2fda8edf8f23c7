//! Filter types for the visible node list.

use serde::{Deserialize, Serialize};

use super::node::{Node, NodeKind};
use super::sorting::SortSpec;
use super::status::IndexStatus;

/// Restricts the list to one node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    /// Files and folders.
    #[default]
    All,
    /// Files only.
    File,
    /// Folders only.
    Folder,
}

impl TypeFilter {
    /// Whether `kind` passes this filter.
    pub fn accepts(&self, kind: NodeKind) -> bool {
        match self {
            Self::All => true,
            Self::File => kind == NodeKind::File,
            Self::Folder => kind == NodeKind::Directory,
        }
    }
}

/// Restricts the list to one exact index status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode", content = "status")]
pub enum StatusFilter {
    /// Any status.
    #[default]
    All,
    /// Exactly this status.
    Only(IndexStatus),
}

impl StatusFilter {
    /// Whether `status` passes this filter.
    pub fn accepts(&self, status: IndexStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

/// Everything the presentation layer can set through `set_filters`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFilter {
    /// Case-insensitive name substring.
    #[serde(default)]
    pub query: String,
    /// Node kind restriction.
    #[serde(default)]
    pub node_type: TypeFilter,
    /// Index status restriction.
    #[serde(default)]
    pub index_status: StatusFilter,
    /// Ordering of the result.
    #[serde(default)]
    pub sort: SortSpec,
}

impl NodeFilter {
    /// Whether any narrowing filter is set. Sorting alone does not count.
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
            || self.node_type != TypeFilter::All
            || self.index_status != StatusFilter::All
    }

    /// Apply the name, type and status filters, in that order.
    pub fn matches(&self, node: &Node) -> bool {
        let query = self.query.trim();
        if !query.is_empty()
            && !node
                .display_name()
                .to_lowercase()
                .contains(&query.to_lowercase())
        {
            return false;
        }
        self.node_type.accepts(node.kind) && self.index_status.accepts(node.index_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_inactive() {
        assert!(!NodeFilter::default().is_active());
        let blank = NodeFilter {
            query: "   ".into(),
            ..Default::default()
        };
        assert!(!blank.is_active());
    }

    #[test]
    fn test_each_filter_activates() {
        let by_query = NodeFilter {
            query: "report".into(),
            ..Default::default()
        };
        let by_type = NodeFilter {
            node_type: TypeFilter::Folder,
            ..Default::default()
        };
        let by_status = NodeFilter {
            index_status: StatusFilter::Only(IndexStatus::Error),
            ..Default::default()
        };
        assert!(by_query.is_active());
        assert!(by_type.is_active());
        assert!(by_status.is_active());
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let filter = NodeFilter {
            query: "REPORT".into(),
            ..Default::default()
        };
        assert!(filter.matches(&Node::file("1", "/a/Annual-report.pdf")));
        assert!(!filter.matches(&Node::file("2", "/a/notes.txt")));
    }

    #[test]
    fn test_matches_combines_type_and_status() {
        let filter = NodeFilter {
            node_type: TypeFilter::File,
            index_status: StatusFilter::Only(IndexStatus::Indexed),
            ..Default::default()
        };
        let indexed = Node::file("1", "/a.txt").with_status(IndexStatus::Indexed);
        let pending = Node::file("2", "/b.txt").with_status(IndexStatus::Pending);
        let folder = Node::folder("3", "/c").with_status(IndexStatus::Indexed);
        assert!(filter.matches(&indexed));
        assert!(!filter.matches(&pending));
        assert!(!filter.matches(&folder));
    }
}
