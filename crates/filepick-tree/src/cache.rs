//! Lazy folder-content cache.
//!
//! Each folder moves through `Unknown -> Loading -> Known` on a successful
//! fetch and `Unknown -> Loading -> Unknown` on a failed one. A folder that
//! is absent from the cache is unknown, which is different from a folder
//! that is known and empty. Entries are never evicted; [`TreeCache::clear`]
//! wipes everything at once.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use filepick_core::types::{IndexStatus, Node, NodeId};

/// Cache slot: the connection root or one folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FolderKey {
    /// Synthetic root entry.
    Root,
    /// A folder by id.
    Folder(NodeId),
}

impl FolderKey {
    /// The `resource_id` sent to the listing service.
    pub fn resource_id(&self) -> Option<NodeId> {
        match self {
            Self::Root => None,
            Self::Folder(id) => Some(id.clone()),
        }
    }

    /// The folder id, if this is not the root.
    pub fn folder_id(&self) -> Option<&NodeId> {
        match self {
            Self::Root => None,
            Self::Folder(id) => Some(id),
        }
    }
}

impl From<NodeId> for FolderKey {
    fn from(id: NodeId) -> Self {
        Self::Folder(id)
    }
}

impl std::fmt::Display for FolderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => f.write_str("<root>"),
            Self::Folder(id) => write!(f, "{id}"),
        }
    }
}

/// Folder key to direct children, plus the set of folders being fetched.
#[derive(Debug, Clone, Default)]
pub struct TreeCache {
    entries: BTreeMap<FolderKey, Vec<Node>>,
    loading: BTreeSet<FolderKey>,
}

impl TreeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Known direct children of `key`, or `None` when unknown.
    pub fn children(&self, key: &FolderKey) -> Option<&[Node]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Known direct children of a folder.
    pub fn folder_children(&self, id: &NodeId) -> Option<&[Node]> {
        self.children(&FolderKey::Folder(id.clone()))
    }

    /// Whether the children of `key` have been fetched.
    pub fn is_known(&self, key: &FolderKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether a fetch for `key` is in flight.
    pub fn is_loading(&self, key: &FolderKey) -> bool {
        self.loading.contains(key)
    }

    /// Mark `key` as loading. Returns `false` when a fetch is already
    /// outstanding, in which case the caller must not issue another one.
    pub fn begin_load(&mut self, key: &FolderKey) -> bool {
        let started = self.loading.insert(key.clone());
        debug!(folder = %key, started, "Begin folder load");
        started
    }

    /// Store a successful fetch, replacing any previous entry.
    pub fn finish_load(&mut self, key: &FolderKey, nodes: Vec<Node>) {
        self.loading.remove(key);
        debug!(folder = %key, count = nodes.len(), "Folder known");
        self.entries.insert(key.clone(), nodes);
    }

    /// Record a failed fetch: the folder stays unknown.
    pub fn fail_load(&mut self, key: &FolderKey) {
        self.loading.remove(key);
        debug!(folder = %key, "Folder load failed, still unknown");
    }

    /// Root-level nodes (empty until the root is fetched).
    pub fn root_nodes(&self) -> &[Node] {
        self.children(&FolderKey::Root).unwrap_or(&[])
    }

    /// Every known folder entry, root excluded, in key order.
    pub fn folder_entries(&self) -> impl Iterator<Item = (&NodeId, &[Node])> {
        self.entries
            .iter()
            .filter_map(|(key, nodes)| key.folder_id().map(|id| (id, nodes.as_slice())))
    }

    /// Every known node once, root entries first.
    pub fn all_nodes(&self) -> Vec<&Node> {
        let mut seen = HashSet::new();
        self.entries
            .values()
            .flatten()
            .filter(|node| seen.insert(&node.id))
            .collect()
    }

    /// First cached copy of a node.
    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        self.entries.values().flatten().find(|node| &node.id == id)
    }

    /// Known folder nodes whose own children have not been fetched.
    pub fn unknown_folders(&self) -> Vec<NodeId> {
        self.all_nodes()
            .into_iter()
            .filter(|node| node.is_folder() && !self.is_known(&FolderKey::Folder(node.id.clone())))
            .map(|node| node.id.clone())
            .collect()
    }

    /// Overwrite the index status of every cached copy of `id`.
    /// Returns the number of copies updated.
    pub fn set_status(&mut self, id: &NodeId, status: IndexStatus) -> usize {
        let mut updated = 0;
        for node in self.entries.values_mut().flatten() {
            if &node.id == id {
                node.index_status = status;
                updated += 1;
            }
        }
        updated
    }

    /// Number of known entries, root included.
    pub fn known_count(&self) -> usize {
        self.entries.len()
    }

    /// Drop every entry and loading flag.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.loading.clear();
    }
}
