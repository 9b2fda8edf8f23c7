//! Visible-list computation: working set, filtering and sorting.
//!
//! With no narrowing filter the list is the current folder's children (or
//! the root list minus anything already listed under a cached folder).
//! As soon as a query, type or status filter is set the search goes global
//! over every node known anywhere in the cache.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};

use filepick_core::types::{Node, NodeFilter, NodeId, SortDirection, SortKey, SortSpec};

use crate::cache::TreeCache;
use crate::navigation::NavigationStack;

/// Nodes considered before filtering.
pub fn working_set(cache: &TreeCache, navigation: &NavigationStack, filter: &NodeFilter) -> Vec<Node> {
    if filter.is_active() {
        return cache.all_nodes().into_iter().cloned().collect();
    }
    if navigation.current().is_some() {
        return navigation.displayed().to_vec();
    }
    let nested: HashSet<&NodeId> = cache
        .folder_entries()
        .flat_map(|(_, children)| children.iter().map(|n| &n.id))
        .collect();
    cache
        .root_nodes()
        .iter()
        .filter(|node| !nested.contains(&node.id))
        .cloned()
        .collect()
}

/// The filtered, ordered list to render. `now` stands in for missing
/// timestamps when sorting by date.
pub fn visible_nodes(
    cache: &TreeCache,
    navigation: &NavigationStack,
    filter: &NodeFilter,
    now: DateTime<Utc>,
) -> Vec<Node> {
    let mut nodes: Vec<Node> = working_set(cache, navigation, filter)
        .into_iter()
        .filter(|node| filter.matches(node))
        .collect();
    sort_nodes(&mut nodes, filter.sort, now);
    nodes
}

/// Stable sort in place.
pub fn sort_nodes(nodes: &mut [Node], sort: SortSpec, now: DateTime<Utc>) {
    nodes.sort_by(|a, b| {
        let ordering = match sort.key {
            SortKey::Name => compare_names(a.display_name(), b.display_name()),
            SortKey::Modified => a
                .modified_or_created()
                .unwrap_or(now)
                .cmp(&b.modified_or_created().unwrap_or(now)),
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Case-insensitive first, then by code point so `a` and `A` order
/// deterministically.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
