//! The browsing state record.
//!
//! [`BrowserState`] bundles everything one session knows. Its mutating
//! methods are synchronous and total; the async coordination around them
//! lives in [`crate::session`].

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use tracing::debug;

use filepick_core::error::AppError;
use filepick_core::types::{ConnectionId, IndexId, IndexStatus, Node, NodeFilter, NodeId, SortSpec};

use crate::cache::{FolderKey, TreeCache};
use crate::filter;
use crate::navigation::{Frame, NavigationStack};
use crate::selection::{self, Selection, TriState};

/// Everything a browsing session knows about one connection.
#[derive(Debug, Clone)]
pub struct BrowserState {
    /// Connection being browsed.
    pub connection: ConnectionId,
    /// Bumped on every wipe; loads started under an older value are stale.
    pub generation: u64,
    /// Known folder contents.
    pub cache: TreeCache,
    /// Breadcrumbs and displayed list.
    pub navigation: NavigationStack,
    /// Selected node ids.
    pub selection: Selection,
    /// Active filters and sort.
    pub filter: NodeFilter,
    /// Folders expanded inline.
    pub expanded: BTreeSet<NodeId>,
    /// Index created by the last successful bulk index.
    pub active_index: Option<IndexId>,
    /// Failures of background loads not yet reported.
    pub load_errors: Vec<(FolderKey, AppError)>,
}

impl BrowserState {
    /// Empty state for `connection`, sorted by `sort`.
    pub fn new(connection: ConnectionId, sort: SortSpec) -> Self {
        Self {
            connection,
            generation: 0,
            cache: TreeCache::new(),
            navigation: NavigationStack::default(),
            selection: Selection::new(),
            filter: NodeFilter {
                sort,
                ..Default::default()
            },
            expanded: BTreeSet::new(),
            active_index: None,
            load_errors: Vec::new(),
        }
    }

    /// Forget everything learned so far and start a new generation.
    /// Filters survive; the active index does not.
    pub fn reset(&mut self, connection: ConnectionId) {
        self.connection = connection;
        self.generation += 1;
        self.cache.clear();
        self.navigation = NavigationStack::default();
        self.selection.clear();
        self.expanded.clear();
        self.active_index = None;
        self.load_errors.clear();
        debug!(generation = self.generation, connection = %self.connection, "Browser state reset");
    }

    /// Store freshly fetched children of `key` and reconcile the selection.
    ///
    /// Ids that disappeared from the folder leave the selection. A folder
    /// that is selected when its children land extends its selection to
    /// them; whatever toggles happened while it was loading are already
    /// reflected in that membership.
    pub fn apply_loaded(&mut self, key: &FolderKey, nodes: Vec<Node>) {
        if let Some(previous) = self.cache.children(key) {
            let stale: Vec<NodeId> = previous
                .iter()
                .filter(|old| !nodes.iter().any(|new| new.id == old.id))
                .map(|old| old.id.clone())
                .collect();
            for id in stale {
                self.selection.remove(&id);
            }
        }

        self.cache.finish_load(key, nodes);

        if let FolderKey::Folder(id) = key {
            self.selection = selection::reconcile_loaded(&self.cache, &self.selection, id);
        }

        self.navigation = self.navigation.synced_with(&self.cache);
    }

    /// Write index statuses into every cached copy of each node.
    pub fn apply_statuses(&mut self, statuses: &HashMap<NodeId, IndexStatus>) {
        for (id, status) in statuses {
            self.cache.set_status(id, *status);
        }
        self.navigation = self.navigation.synced_with(&self.cache);
    }

    /// Whether `id` is a cached folder node.
    pub fn is_folder(&self, id: &NodeId) -> bool {
        self.cache.find(id).is_some_and(Node::is_folder)
    }

    /// The filtered, sorted list to render.
    pub fn visible_nodes(&self, now: DateTime<Utc>) -> Vec<Node> {
        filter::visible_nodes(&self.cache, &self.navigation, &self.filter, now)
    }

    /// Breadcrumb frames, root-most first.
    pub fn breadcrumbs(&self) -> &[Frame] {
        self.navigation.frames()
    }

    /// Checkbox state of `id`.
    pub fn tri_state(&self, id: &NodeId) -> TriState {
        selection::tri_state(&self.cache, &self.selection, id)
    }

    /// See [`selection::is_folder_fully_selected`].
    pub fn is_folder_fully_selected(&self, id: &NodeId) -> bool {
        selection::is_folder_fully_selected(&self.cache, &self.selection, id)
    }

    /// See [`selection::is_folder_partially_selected`].
    pub fn is_folder_partially_selected(&self, id: &NodeId) -> bool {
        selection::is_folder_partially_selected(&self.cache, &self.selection, id)
    }

    /// Distinct selected known nodes.
    pub fn total_selected_count(&self) -> usize {
        selection::total_selected_count(&self.cache, &self.selection)
    }

    /// Selected nodes among the root list and expanded folders.
    pub fn visible_selected_count(&self) -> usize {
        selection::visible_selected_count(&self.cache, &self.selection, &self.expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> BrowserState {
        let mut state = BrowserState::new(ConnectionId::new("c"), SortSpec::default());
        state.apply_loaded(
            &FolderKey::Root,
            vec![Node::folder("a", "/A"), Node::file("f1", "/File1.pdf")],
        );
        state.navigation = NavigationStack::at_root(state.cache.root_nodes().to_vec());
        state
    }

    #[test]
    fn test_apply_loaded_for_deselected_folder_selects_nothing() {
        let mut state = state();
        state.apply_loaded(
            &FolderKey::Folder(NodeId::new("a")),
            vec![Node::file("f2", "/A/File2.txt")],
        );
        assert!(state.selection.is_empty());
        assert_eq!(state.tri_state(&NodeId::new("a")), TriState::None);
    }

    #[test]
    fn test_selected_unknown_folder_extends_to_children() {
        let mut state = state();
        state.selection.insert(NodeId::new("a"));
        state.apply_loaded(
            &FolderKey::Folder(NodeId::new("a")),
            vec![Node::file("f2", "/A/File2.txt")],
        );
        assert_eq!(state.tri_state(&NodeId::new("a")), TriState::Full);
    }

    #[test]
    fn test_reload_drops_vanished_ids() {
        let mut state = state();
        let key = FolderKey::Folder(NodeId::new("a"));
        state.apply_loaded(&key, vec![Node::file("x", "/A/x"), Node::file("y", "/A/y")]);
        state.selection.insert(NodeId::new("x"));
        state.apply_loaded(&key, vec![Node::file("y", "/A/y")]);
        assert!(!state.selection.contains(&NodeId::new("x")));
    }

    #[test]
    fn test_statuses_reach_displayed_list() {
        let mut state = state();
        let statuses = HashMap::from([(NodeId::new("f1"), IndexStatus::Indexed)]);
        state.apply_statuses(&statuses);
        let shown = state
            .navigation
            .displayed()
            .iter()
            .find(|n| n.id.as_str() == "f1")
            .unwrap();
        assert_eq!(shown.index_status, IndexStatus::Indexed);
    }

    #[test]
    fn test_reset_bumps_generation() {
        let mut state = state();
        state.selection.insert(NodeId::new("f1"));
        state.reset(ConnectionId::new("other"));
        assert_eq!(state.generation, 1);
        assert_eq!(state.cache.known_count(), 0);
        assert!(state.selection.is_empty());
        assert_eq!(state.connection.as_str(), "other");
    }
}
