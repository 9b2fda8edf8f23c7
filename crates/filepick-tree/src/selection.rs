//! Tri-state selection over a partially known tree.
//!
//! Everything here is defined against what the [`TreeCache`] knows. For a
//! folder whose children are known, the folder is in the selection iff all
//! of its known descendants are. A folder whose children were never
//! fetched is judged by its own membership only, so selecting it before it
//! loads marks it optimistically; [`reconcile_loaded`] completes the
//! picture once the children arrive.
//!
//! "Partially selected" counts selected known descendants only. A folder
//! whose only child was deselected has none selected, so it reads as
//! unselected, the same as a folder nobody touched.
//!
//! The primitives (`bubble_up`, `cascade_down`) mutate a selection in
//! place; the public operations take the previous selection and return the
//! next one.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use filepick_core::types::NodeId;

use crate::cache::TreeCache;

/// Selected node ids.
pub type Selection = BTreeSet<NodeId>;

/// Checkbox state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    /// Selected, with every known descendant.
    Full,
    /// Some but not all known descendants selected.
    Partial,
    /// Nothing selected.
    None,
}

/// The known folder listing `id` as a direct child; `None` at the root or
/// when the parent was never fetched.
pub fn direct_parent<'a>(cache: &'a TreeCache, id: &NodeId) -> Option<&'a NodeId> {
    cache
        .folder_entries()
        .find(|(_, children)| children.iter().any(|child| &child.id == id))
        .map(|(folder, _)| folder)
}

/// Every known node id below `folder`, descending only into folders whose
/// children are cached. Uses an explicit worklist; a malformed listing that
/// nests a folder inside itself is visited once.
pub fn all_descendants(cache: &TreeCache, folder: &NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut seen: HashSet<&NodeId> = HashSet::from([folder]);
    let mut worklist = vec![folder];

    while let Some(current) = worklist.pop() {
        let Some(children) = cache.folder_children(current) else {
            continue;
        };
        for child in children {
            if !seen.insert(&child.id) {
                continue;
            }
            out.push(child.id.clone());
            if child.is_folder() {
                worklist.push(&child.id);
            }
        }
    }
    out
}

/// Whether every known descendant of `folder` is selected. With no known
/// descendants this is the folder's own membership.
pub fn all_descendants_selected(cache: &TreeCache, folder: &NodeId, selection: &Selection) -> bool {
    let descendants = all_descendants(cache, folder);
    if descendants.is_empty() {
        selection.contains(folder)
    } else {
        descendants.iter().all(|id| selection.contains(id))
    }
}

/// Recompute every known ancestor of `node`, adding it to or removing it
/// from `selection`.
pub fn bubble_up(cache: &TreeCache, node: &NodeId, selection: &mut Selection) {
    let mut visited: HashSet<&NodeId> = HashSet::new();
    let mut current = node;
    while let Some(parent) = direct_parent(cache, current) {
        if !visited.insert(parent) {
            break;
        }
        if all_descendants_selected(cache, parent, selection) {
            selection.insert(parent.clone());
        } else {
            selection.remove(parent);
        }
        current = parent;
    }
}

/// Add or remove `folder` and every known descendant.
pub fn cascade_down(cache: &TreeCache, folder: &NodeId, select: bool, selection: &mut Selection) {
    let ids = all_descendants(cache, folder)
        .into_iter()
        .chain(std::iter::once(folder.clone()));
    if select {
        selection.extend(ids);
    } else {
        for id in ids {
            selection.remove(&id);
        }
    }
}

/// Flip one leaf and recompute its ancestors.
pub fn toggle_node(cache: &TreeCache, selection: &Selection, id: &NodeId) -> Selection {
    let mut next = selection.clone();
    if !next.remove(id) {
        next.insert(id.clone());
    }
    bubble_up(cache, id, &mut next);
    next
}

/// Select a folder's whole known subtree unless it is already fully
/// selected, in which case deselect it. Ancestors are recomputed.
pub fn toggle_folder(cache: &TreeCache, selection: &Selection, id: &NodeId) -> Selection {
    let select = !is_folder_fully_selected(cache, selection, id);
    let mut next = selection.clone();
    cascade_down(cache, id, select, &mut next);
    bubble_up(cache, id, &mut next);
    next
}

/// Every node in the known forest.
pub fn select_all(cache: &TreeCache) -> Selection {
    cache.all_nodes().into_iter().map(|node| node.id.clone()).collect()
}

/// Apply a folder's freshly loaded children to the selection.
///
/// The folder's own membership at completion time decides: a selected
/// folder extends its selection to the new subtree, an unselected one adds
/// nothing. Its ancestors are recomputed either way.
pub fn reconcile_loaded(cache: &TreeCache, selection: &Selection, folder: &NodeId) -> Selection {
    let mut next = selection.clone();
    if next.contains(folder) {
        cascade_down(cache, folder, true, &mut next);
    }
    bubble_up(cache, folder, &mut next);
    next
}

/// Whether `folder` and all of its known descendants are selected.
pub fn is_folder_fully_selected(cache: &TreeCache, selection: &Selection, folder: &NodeId) -> bool {
    all_descendants_selected(cache, folder, selection)
}

/// Whether some, but not all, known descendants of `folder` are selected.
pub fn is_folder_partially_selected(
    cache: &TreeCache,
    selection: &Selection,
    folder: &NodeId,
) -> bool {
    let descendants = all_descendants(cache, folder);
    let selected = descendants.iter().filter(|id| selection.contains(*id)).count();
    selected > 0 && selected < descendants.len()
}

/// Checkbox state for any node.
pub fn tri_state(cache: &TreeCache, selection: &Selection, id: &NodeId) -> TriState {
    let is_folder = cache.find(id).is_some_and(|node| node.is_folder());
    if !is_folder {
        return if selection.contains(id) {
            TriState::Full
        } else {
            TriState::None
        };
    }
    if is_folder_fully_selected(cache, selection, id) {
        TriState::Full
    } else if is_folder_partially_selected(cache, selection, id) {
        TriState::Partial
    } else {
        TriState::None
    }
}

/// Selected known nodes, each counted once even when it appears both in a
/// folder listing and in the root list.
pub fn total_selected_count(cache: &TreeCache, selection: &Selection) -> usize {
    cache
        .all_nodes()
        .into_iter()
        .filter(|node| selection.contains(&node.id))
        .count()
}

/// Selected nodes among those currently rendered: the root list plus the
/// children of every expanded folder.
pub fn visible_selected_count(
    cache: &TreeCache,
    selection: &Selection,
    expanded: &BTreeSet<NodeId>,
) -> usize {
    let mut visible: HashSet<&NodeId> = cache.root_nodes().iter().map(|n| &n.id).collect();
    for folder in expanded {
        if let Some(children) = cache.folder_children(folder) {
            visible.extend(children.iter().map(|n| &n.id));
        }
    }
    visible.into_iter().filter(|id| selection.contains(*id)).count()
}
