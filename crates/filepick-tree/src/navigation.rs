//! Breadcrumb navigation.
//!
//! Every transition returns a new [`NavigationStack`]; fetching the
//! children to display is the caller's job (see
//! [`crate::session::BrowserSession`]).

use serde::{Deserialize, Serialize};

use filepick_core::types::{Node, NodeId};

use crate::cache::{FolderKey, TreeCache};

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// The opened folder.
    pub folder_id: NodeId,
    /// Its name at the time it was opened.
    pub folder_name: String,
}

impl Frame {
    /// Create a frame.
    pub fn new(folder_id: impl Into<NodeId>, folder_name: impl Into<String>) -> Self {
        Self {
            folder_id: folder_id.into(),
            folder_name: folder_name.into(),
        }
    }
}

/// Path from the root to the current folder plus what is displayed there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationStack {
    frames: Vec<Frame>,
    displayed: Vec<Node>,
}

impl NavigationStack {
    /// A stack positioned at the root, showing `root_nodes`.
    pub fn at_root(root_nodes: Vec<Node>) -> Self {
        Self {
            frames: Vec::new(),
            displayed: root_nodes,
        }
    }

    /// Breadcrumb frames, root-most first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The currently displayed child list.
    pub fn displayed(&self) -> &[Node] {
        &self.displayed
    }

    /// Frame of the current folder; `None` at the root.
    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Cache key of the folder being shown.
    pub fn current_key(&self) -> FolderKey {
        match self.current() {
            Some(frame) => FolderKey::Folder(frame.folder_id.clone()),
            None => FolderKey::Root,
        }
    }

    /// Whether the stack is empty.
    pub fn is_at_root(&self) -> bool {
        self.frames.is_empty()
    }

    /// Open a folder: push `frame` and display `children`.
    pub fn pushed(&self, frame: Frame, children: Vec<Node>) -> Self {
        let mut frames = self.frames.clone();
        frames.push(frame);
        Self {
            frames,
            displayed: children,
        }
    }

    /// Breadcrumb jump: the stack is replaced by `target_stack`, never
    /// extended, so jumping back along a visited path cannot duplicate
    /// frames.
    pub fn jumped(target_stack: Vec<Frame>, children: Vec<Node>) -> Self {
        Self {
            frames: target_stack,
            displayed: children,
        }
    }

    /// The folder `back` would display.
    pub fn back_target(&self) -> FolderKey {
        match self.frames.len() {
            0 | 1 => FolderKey::Root,
            n => FolderKey::Folder(self.frames[n - 2].folder_id.clone()),
        }
    }

    /// Pop the last frame and display `children` (the root list when the
    /// stack becomes empty). Popping an empty stack changes nothing.
    pub fn popped(&self, children: Vec<Node>) -> Self {
        if self.frames.is_empty() {
            return self.clone();
        }
        let mut frames = self.frames.clone();
        frames.pop();
        Self {
            frames,
            displayed: children,
        }
    }

    /// Frames up to and including `index`, for building a jump target.
    pub fn truncated_to(&self, index: usize) -> Option<Vec<Frame>> {
        (index < self.frames.len()).then(|| self.frames[..=index].to_vec())
    }

    /// Re-read the displayed list from `cache` when the current folder is
    /// known, so status updates and reloads show through.
    pub fn synced_with(&self, cache: &TreeCache) -> Self {
        match cache.children(&self.current_key()) {
            Some(children) => Self {
                frames: self.frames.clone(),
                displayed: children.to_vec(),
            },
            None => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> NavigationStack {
        NavigationStack::default()
            .pushed(Frame::new("a", "A"), vec![Node::folder("b", "/A/B")])
            .pushed(Frame::new("b", "B"), vec![Node::folder("c", "/A/B/C")])
            .pushed(Frame::new("c", "C"), vec![Node::file("x", "/A/B/C/x")])
    }

    #[test]
    fn test_push_tracks_current() {
        let nav = abc();
        assert_eq!(nav.frames().len(), 3);
        assert_eq!(nav.current().unwrap().folder_id.as_str(), "c");
        assert_eq!(nav.displayed()[0].id.as_str(), "x");
    }

    #[test]
    fn test_jump_replaces_instead_of_appending() {
        let nav = abc();
        let target = nav.truncated_to(1).unwrap();
        let jumped = NavigationStack::jumped(target, vec![Node::folder("c", "/A/B/C")]);
        let ids: Vec<&str> = jumped.frames().iter().map(|f| f.folder_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_back_target_and_pop() {
        let nav = abc();
        assert_eq!(nav.back_target(), FolderKey::Folder(NodeId::new("b")));
        let back = nav.popped(vec![Node::folder("c", "/A/B/C")]);
        assert_eq!(back.current().unwrap().folder_id.as_str(), "b");

        let single = NavigationStack::default().pushed(Frame::new("a", "A"), Vec::new());
        assert_eq!(single.back_target(), FolderKey::Root);
        let root = single.popped(vec![Node::file("r", "/r")]);
        assert!(root.is_at_root());
        assert_eq!(root.displayed().len(), 1);
    }

    #[test]
    fn test_pop_on_empty_is_noop() {
        let nav = NavigationStack::at_root(vec![Node::file("r", "/r")]);
        assert_eq!(nav.popped(Vec::new()), nav);
    }

    #[test]
    fn test_truncate_out_of_range() {
        assert!(abc().truncated_to(3).is_none());
    }

    #[test]
    fn test_synced_with_cache() {
        let mut cache = TreeCache::new();
        cache.finish_load(
            &FolderKey::Folder(NodeId::new("c")),
            vec![Node::file("y", "/A/B/C/y")],
        );
        let synced = abc().synced_with(&cache);
        assert_eq!(synced.displayed()[0].id.as_str(), "y");
    }
}
