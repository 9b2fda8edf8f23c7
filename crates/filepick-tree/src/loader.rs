//! Cursor-following folder fetches.

use std::sync::Arc;

use tracing::{debug, instrument};

use filepick_core::config::browser::BrowserConfig;
use filepick_core::error::AppError;
use filepick_core::result::AppResult;
use filepick_core::traits::listing::ResourceLister;
use filepick_core::types::{ConnectionId, ListRequest, Node};

use crate::cache::FolderKey;

/// Fetches every page of one folder from a [`ResourceLister`].
#[derive(Debug, Clone)]
pub struct FolderLoader {
    lister: Arc<dyn ResourceLister>,
    page_size: u32,
    max_pages: u32,
}

impl FolderLoader {
    /// Create a loader with the paging limits from `config`.
    pub fn new(lister: Arc<dyn ResourceLister>, config: &BrowserConfig) -> Self {
        Self {
            lister,
            page_size: config.page_size,
            max_pages: config.max_pages,
        }
    }

    /// The underlying listing provider.
    pub fn lister(&self) -> &Arc<dyn ResourceLister> {
        &self.lister
    }

    /// All direct children of `key`, in listing order.
    ///
    /// Fails with a validation error when the listing keeps returning a
    /// cursor past `max_pages`, which guards against a service that never
    /// terminates its pagination.
    #[instrument(skip(self), fields(provider = self.lister.provider_type()))]
    pub async fn load(&self, connection: &ConnectionId, key: &FolderKey) -> AppResult<Vec<Node>> {
        let first = ListRequest::first(key.resource_id(), self.page_size);
        let mut request = first.clone();
        let mut nodes = Vec::new();
        let mut pages = 0u32;

        loop {
            let page = self.lister.list_children(connection, &request).await?;
            pages += 1;
            nodes.extend(page.data);

            match page.next_cursor {
                Some(cursor) if pages >= self.max_pages => {
                    return Err(AppError::validation(format!(
                        "Listing of {key} did not finish within {} pages (next cursor {cursor})",
                        self.max_pages
                    )));
                }
                Some(cursor) => request = first.next(cursor),
                None => break,
            }
        }

        debug!(folder = %key, pages, count = nodes.len(), "Folder listing complete");
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filepick_core::error::ErrorKind;
    use filepick_core::types::NodeId;
    use filepick_source::memory::{FixtureTree, MemoryLister};

    fn lister(count: usize) -> MemoryLister {
        let nodes = (0..count)
            .map(|i| Node::file(format!("f{i}"), format!("/big/f{i}")))
            .collect();
        MemoryLister::new(
            FixtureTree::new()
                .with_root(vec![Node::folder("big", "/big")])
                .with_children("big", nodes),
        )
    }

    fn config(page_size: u32, max_pages: u32) -> BrowserConfig {
        BrowserConfig {
            page_size,
            max_pages,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_follows_cursors() {
        let source = lister(7);
        let loader = FolderLoader::new(Arc::new(source.clone()), &config(3, 10));
        let nodes = loader
            .load(&ConnectionId::new("c"), &FolderKey::Folder(NodeId::new("big")))
            .await
            .unwrap();
        assert_eq!(nodes.len(), 7);
        assert_eq!(nodes[6].id.as_str(), "f6");
        assert_eq!(source.call_count(Some(&NodeId::new("big"))), 3);
    }

    #[tokio::test]
    async fn test_page_guard() {
        let loader = FolderLoader::new(Arc::new(lister(7)), &config(3, 2));
        let err = loader
            .load(&ConnectionId::new("c"), &FolderKey::Folder(NodeId::new("big")))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_exact_page_boundary() {
        let loader = FolderLoader::new(Arc::new(lister(6)), &config(3, 2));
        let nodes = loader
            .load(&ConnectionId::new("c"), &FolderKey::Folder(NodeId::new("big")))
            .await
            .unwrap();
        assert_eq!(nodes.len(), 6);
    }
}
