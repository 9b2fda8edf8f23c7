//! One browsing session over a listing service.
//!
//! The session owns a [`BrowserState`] behind a `tokio::sync::RwLock`. The
//! lock is never held across a listing call: a fetch marks the folder as
//! loading, releases the lock, awaits the lister and re-acquires the lock
//! to apply the result. The loading flag is the only guard against
//! duplicate fetches. Results that arrive after a refresh or connection
//! switch are dropped by comparing generations.
//!
//! Toggling a folder whose children are unknown marks the folder itself
//! and starts a background load. Background loads complete in any order;
//! each completion is applied atomically under the write lock and reads
//! the folder's membership at that moment. Any later toggle, including a
//! cascade from an ancestor, has already updated that membership, so the
//! most recent action wins.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use filepick_core::config::browser::BrowserConfig;
use filepick_core::error::AppError;
use filepick_core::result::AppResult;
use filepick_core::traits::listing::ResourceLister;
use filepick_core::types::{
    ConnectionId, IndexId, IndexStatus, Node, NodeFilter, NodeId, SortSpec,
};

use crate::cache::FolderKey;
use crate::loader::FolderLoader;
use crate::navigation::{Frame, NavigationStack};
use crate::selection::{self, TriState};
use crate::state::BrowserState;

/// Result of a guarded fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The children were fetched and stored.
    Loaded(Vec<Node>),
    /// A fetch for the folder was already in flight; nothing was issued.
    AlreadyLoading,
    /// The state was wiped while the fetch was running; the result was
    /// dropped.
    Discarded,
}

#[derive(Debug)]
struct SessionInner {
    loader: FolderLoader,
    state: RwLock<BrowserState>,
    background: Mutex<Vec<JoinHandle<()>>>,
}

/// Shared handle to a browsing session. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct BrowserSession {
    inner: Arc<SessionInner>,
}

impl BrowserSession {
    /// Create a session on `connection`. Nothing is fetched until
    /// [`BrowserSession::load_root`].
    pub fn new(
        lister: Arc<dyn ResourceLister>,
        config: &BrowserConfig,
        connection: ConnectionId,
    ) -> Self {
        let sort = SortSpec::new(config.default_sort_key, config.default_sort_direction);
        Self {
            inner: Arc::new(SessionInner {
                loader: FolderLoader::new(lister, config),
                state: RwLock::new(BrowserState::new(connection, sort)),
                background: Mutex::new(Vec::new()),
            }),
        }
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Fetch the children of `key` unless a fetch is already in flight.
    ///
    /// On failure the folder stays unknown, its loading flag is cleared and
    /// the error is returned to the caller. Nothing is retried.
    pub async fn fetch(&self, key: &FolderKey) -> AppResult<FetchOutcome> {
        let (connection, generation) = {
            let mut state = self.inner.state.write().await;
            if !state.cache.begin_load(key) {
                debug!(folder = %key, "Fetch already in flight, skipping");
                return Ok(FetchOutcome::AlreadyLoading);
            }
            (state.connection.clone(), state.generation)
        };

        let result = self.inner.loader.load(&connection, key).await;

        let mut state = self.inner.state.write().await;
        if state.generation != generation {
            warn!(
                folder = %key,
                started = generation,
                current = state.generation,
                "Discarding folder load from a previous generation"
            );
            return Ok(FetchOutcome::Discarded);
        }

        match result {
            Ok(nodes) => {
                state.apply_loaded(key, nodes.clone());
                Ok(FetchOutcome::Loaded(nodes))
            }
            Err(err) => {
                state.cache.fail_load(key);
                warn!(folder = %key, error = %err, "Folder load failed");
                Err(err)
            }
        }
    }

    /// Cached children of `key`, fetching them when unknown. `None` when
    /// the fetch was skipped or discarded.
    async fn children_of(&self, key: &FolderKey) -> AppResult<Option<Vec<Node>>> {
        let cached = self
            .inner
            .state
            .read()
            .await
            .cache
            .children(key)
            .map(<[Node]>::to_vec);
        if cached.is_some() {
            return Ok(cached);
        }
        match self.fetch(key).await? {
            FetchOutcome::Loaded(nodes) => Ok(Some(nodes)),
            FetchOutcome::AlreadyLoading | FetchOutcome::Discarded => Ok(None),
        }
    }

    /// Load `key` in the background. Failures are kept for
    /// [`BrowserSession::take_load_errors`].
    async fn spawn_load(&self, key: FolderKey) {
        let session = self.clone();
        let handle = tokio::spawn(async move {
            if let Err(err) = session.fetch(&key).await {
                session.inner.state.write().await.load_errors.push((key, err));
            }
        });
        self.inner.background.lock().await.push(handle);
    }

    /// Wait for every background load started so far, including loads
    /// started while waiting.
    pub async fn settle(&self) {
        loop {
            let handles = std::mem::take(&mut *self.inner.background.lock().await);
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                if let Err(err) = handle.await {
                    warn!(error = %err, "Background load task failed to join");
                }
            }
        }
    }

    /// Failures of background loads since the last call.
    pub async fn take_load_errors(&self) -> Vec<(FolderKey, AppError)> {
        std::mem::take(&mut self.inner.state.write().await.load_errors)
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Fetch the root listing and show it.
    pub async fn load_root(&self) -> AppResult<()> {
        info!("Loading root listing");
        self.fetch(&FolderKey::Root).await.map(|_| ())
    }

    /// Open a folder: push a breadcrumb and display its children.
    ///
    /// Does nothing while the folder is loading. Opening a known file is a
    /// validation error.
    pub async fn open_folder(&self, id: &NodeId, name: &str) -> AppResult<()> {
        let key = FolderKey::Folder(id.clone());
        {
            let state = self.inner.state.read().await;
            if state.cache.is_loading(&key) {
                debug!(folder = %id, "Open ignored, folder is loading");
                return Ok(());
            }
            if state.cache.find(id).is_some_and(|node| !node.is_folder()) {
                return Err(AppError::validation(format!("{id} is not a folder")));
            }
        }

        let Some(children) = self.children_of(&key).await? else {
            return Ok(());
        };
        let mut state = self.inner.state.write().await;
        state.navigation = state.navigation.pushed(Frame::new(id.clone(), name), children);
        info!(folder = %id, depth = state.navigation.frames().len(), "Opened folder");
        Ok(())
    }

    /// Replace the breadcrumb stack with `target_stack`, whose last frame
    /// must be `target_frame`, and display that folder.
    pub async fn jump_to_breadcrumb(
        &self,
        target_stack: Vec<Frame>,
        target_frame: &Frame,
    ) -> AppResult<()> {
        if target_stack.last() != Some(target_frame) {
            return Err(AppError::validation(format!(
                "Breadcrumb {} is not the end of the target stack",
                target_frame.folder_id
            )));
        }
        let key = FolderKey::Folder(target_frame.folder_id.clone());
        if self.inner.state.read().await.cache.is_loading(&key) {
            debug!(folder = %key, "Jump ignored, folder is loading");
            return Ok(());
        }

        let Some(children) = self.children_of(&key).await? else {
            return Ok(());
        };
        let mut state = self.inner.state.write().await;
        state.navigation = NavigationStack::jumped(target_stack, children);
        info!(folder = %key, depth = state.navigation.frames().len(), "Jumped to breadcrumb");
        Ok(())
    }

    /// Jump to the breadcrumb at `index` (0 is the top-level folder).
    pub async fn jump_to_depth(&self, index: usize) -> AppResult<()> {
        let target = self.inner.state.read().await.navigation.truncated_to(index);
        let Some(target_stack) = target else {
            return Err(AppError::validation(format!(
                "No breadcrumb at depth {index}"
            )));
        };
        let Some(frame) = target_stack.last().cloned() else {
            return Ok(());
        };
        self.jump_to_breadcrumb(target_stack, &frame).await
    }

    /// Clear the breadcrumbs and show the root list.
    pub async fn jump_to_root(&self) -> AppResult<()> {
        if self.inner.state.read().await.cache.is_loading(&FolderKey::Root) {
            return Ok(());
        }
        let Some(children) = self.children_of(&FolderKey::Root).await? else {
            return Ok(());
        };
        self.inner.state.write().await.navigation = NavigationStack::at_root(children);
        info!("Jumped to root");
        Ok(())
    }

    /// Pop one breadcrumb. Does nothing at the root or while the folder
    /// being returned to is loading.
    pub async fn go_back(&self) -> AppResult<()> {
        let target = {
            let state = self.inner.state.read().await;
            if state.navigation.is_at_root() {
                return Ok(());
            }
            let target = state.navigation.back_target();
            if state.cache.is_loading(&target) {
                debug!(folder = %target, "Back ignored, folder is loading");
                return Ok(());
            }
            target
        };

        let Some(children) = self.children_of(&target).await? else {
            return Ok(());
        };
        let mut state = self.inner.state.write().await;
        state.navigation = state.navigation.popped(children);
        info!(folder = %target, "Went back");
        Ok(())
    }

    /// Mark a folder expanded inline, loading it when unknown.
    pub async fn expand_folder(&self, id: &NodeId) -> AppResult<()> {
        let key = FolderKey::Folder(id.clone());
        let known = {
            let mut state = self.inner.state.write().await;
            state.expanded.insert(id.clone());
            state.cache.is_known(&key)
        };
        if !known {
            self.fetch(&key).await?;
        }
        Ok(())
    }

    /// Clear the expanded flag of a folder.
    pub async fn collapse_folder(&self, id: &NodeId) {
        self.inner.state.write().await.expanded.remove(id);
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Toggle one node. Folders are routed to
    /// [`BrowserSession::toggle_folder`].
    pub async fn toggle_node(&self, id: &NodeId) {
        let is_folder = self.inner.state.read().await.is_folder(id);
        if is_folder {
            return self.toggle_folder(id).await;
        }
        let mut guard = self.inner.state.write().await;
        let state = &mut *guard;
        state.selection = selection::toggle_node(&state.cache, &state.selection, id);
        debug!(node = %id, selected = state.selection.contains(id), "Toggled node");
    }

    /// Toggle a folder's subtree. When its children are unknown the
    /// toggle is applied optimistically and completed once a background
    /// load resolves.
    pub async fn toggle_folder(&self, id: &NodeId) {
        let key = FolderKey::Folder(id.clone());
        let needs_load = {
            let mut guard = self.inner.state.write().await;
            let state = &mut *guard;
            state.selection = selection::toggle_folder(&state.cache, &state.selection, id);
            let selected = state.selection.contains(id);
            debug!(folder = %id, selected, "Toggled folder");
            !state.cache.is_known(&key)
        };
        if needs_load {
            self.spawn_load(key).await;
        }
    }

    /// Select every known node and load every unknown folder so its
    /// children join the selection when they arrive.
    pub async fn select_all(&self) {
        let unknown = {
            let mut guard = self.inner.state.write().await;
            let state = &mut *guard;
            state.selection = selection::select_all(&state.cache);
            let unknown = state.cache.unknown_folders();
            info!(
                selected = state.selection.len(),
                pending = unknown.len(),
                "Selected all"
            );
            unknown
        };
        for id in unknown {
            self.spawn_load(FolderKey::Folder(id)).await;
        }
    }

    /// Clear the selection.
    pub async fn deselect_all(&self) {
        self.clear_selection().await;
        info!("Deselected all");
    }

    /// Clear the selection. Folders still loading land unselected.
    pub async fn clear_selection(&self) {
        self.inner.state.write().await.selection.clear();
    }

    // ── Filters, refresh, indexing hooks ─────────────────────────────

    /// Replace the filters and sort.
    pub async fn set_filters(&self, filter: NodeFilter) {
        info!(
            query = %filter.query,
            global = filter.is_active(),
            "Filters updated"
        );
        self.inner.state.write().await.filter = filter;
    }

    /// Wipe everything and reload the root of the current connection.
    pub async fn refresh(&self) -> AppResult<()> {
        let connection = self.connection().await;
        self.switch_connection(connection).await
    }

    /// Wipe everything, move to `connection` and load its root. Loads
    /// still in flight are discarded when they finish.
    pub async fn switch_connection(&self, connection: ConnectionId) -> AppResult<()> {
        {
            let mut state = self.inner.state.write().await;
            state.reset(connection.clone());
        }
        info!(connection = %connection, "Switched connection");
        self.load_root().await
    }

    /// Write index statuses into every cached copy of each node.
    pub async fn apply_index_statuses(&self, statuses: &HashMap<NodeId, IndexStatus>) {
        self.inner.state.write().await.apply_statuses(statuses);
    }

    /// Remember the index created by the last bulk index.
    pub async fn set_active_index(&self, index_id: Option<IndexId>) {
        self.inner.state.write().await.active_index = index_id;
    }

    /// Index created by the last successful bulk index.
    pub async fn active_index(&self) -> Option<IndexId> {
        self.inner.state.read().await.active_index.clone()
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// A copy of the full state.
    pub async fn snapshot(&self) -> BrowserState {
        self.inner.state.read().await.clone()
    }

    /// Connection being browsed.
    pub async fn connection(&self) -> ConnectionId {
        self.inner.state.read().await.connection.clone()
    }

    /// Selected ids in sorted order.
    pub async fn selected_ids(&self) -> Vec<NodeId> {
        self.inner.state.read().await.selection.iter().cloned().collect()
    }

    /// Breadcrumb frames.
    pub async fn breadcrumbs(&self) -> Vec<Frame> {
        self.inner.state.read().await.breadcrumbs().to_vec()
    }

    /// The unfiltered child list of the current folder.
    pub async fn displayed(&self) -> Vec<Node> {
        self.inner.state.read().await.navigation.displayed().to_vec()
    }

    /// The filtered, sorted list to render.
    pub async fn visible_nodes(&self) -> Vec<Node> {
        self.inner.state.read().await.visible_nodes(Utc::now())
    }

    /// Current filters.
    pub async fn filter(&self) -> NodeFilter {
        self.inner.state.read().await.filter.clone()
    }

    /// Checkbox state of a node.
    pub async fn tri_state(&self, id: &NodeId) -> TriState {
        self.inner.state.read().await.tri_state(id)
    }

    /// Whether a folder and all its known descendants are selected.
    pub async fn is_folder_fully_selected(&self, id: &NodeId) -> bool {
        self.inner.state.read().await.is_folder_fully_selected(id)
    }

    /// Whether some but not all known descendants are selected.
    pub async fn is_folder_partially_selected(&self, id: &NodeId) -> bool {
        self.inner.state.read().await.is_folder_partially_selected(id)
    }

    /// Distinct selected known nodes.
    pub async fn total_selected_count(&self) -> usize {
        self.inner.state.read().await.total_selected_count()
    }

    /// Selected nodes among the rendered ones.
    pub async fn visible_selected_count(&self) -> usize {
        self.inner.state.read().await.visible_selected_count()
    }

    /// Whether the children of `key` are cached.
    pub async fn is_known(&self, key: &FolderKey) -> bool {
        self.inner.state.read().await.cache.is_known(key)
    }

    /// Whether a fetch for `key` is in flight.
    pub async fn is_loading(&self, key: &FolderKey) -> bool {
        self.inner.state.read().await.cache.is_loading(key)
    }

    /// First cached copy of a node.
    pub async fn find(&self, id: &NodeId) -> Option<Node> {
        self.inner.state.read().await.cache.find(id).cloned()
    }

    /// Cached children of `key` without fetching.
    pub async fn cached_children(&self, key: &FolderKey) -> Option<Vec<Node>> {
        self.inner
            .state
            .read()
            .await
            .cache
            .children(key)
            .map(<[Node]>::to_vec)
    }
}
