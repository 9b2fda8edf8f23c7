//! Local filesystem listing provider.
//!
//! Exposes a directory on disk through the listing contract. Node ids are
//! paths relative to the root (`docs/q1.pdf`), so they stay stable across
//! calls, and the root listing is the directory itself.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;

use filepick_core::error::{AppError, ErrorKind};
use filepick_core::result::AppResult;
use filepick_core::traits::listing::ResourceLister;
use filepick_core::types::{
    ConnectionId, IndexStatus, ListPage, ListRequest, Node, NodeId, NodeKind,
};

/// Local filesystem listing provider.
#[derive(Debug, Clone)]
pub struct LocalDirLister {
    /// Directory exposed as the connection root.
    root: PathBuf,
}

impl LocalDirLister {
    /// Create a lister rooted at an existing directory.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = fs::canonicalize(root_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to resolve listing root: {root_path}"),
                e,
            )
        })?;
        let meta = fs::metadata(&root).await?;
        if !meta.is_dir() {
            return Err(AppError::validation(format!(
                "Listing root is not a directory: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Resolve a node id to an absolute path within the root.
    fn resolve(&self, id: Option<&NodeId>) -> AppResult<PathBuf> {
        let Some(id) = id else {
            return Ok(self.root.clone());
        };
        let relative = Path::new(id.as_str().trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(AppError::validation(format!(
                "Resource id escapes the listing root: {id}"
            )));
        }
        Ok(self.root.join(relative))
    }

    /// Build a node for one directory entry.
    async fn entry_node(&self, path: &Path) -> AppResult<Node> {
        let meta = fs::metadata(path).await?;
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| AppError::internal("Directory entry outside the listing root"))?;
        let id = relative.to_string_lossy().replace('\\', "/");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (kind, size, index_status) = if meta.is_dir() {
            (NodeKind::Directory, None, IndexStatus::NoStatus)
        } else {
            (NodeKind::File, Some(meta.len()), IndexStatus::NotIndexed)
        };

        Ok(Node {
            path: format!("/{id}"),
            id: NodeId::new(id),
            kind,
            name,
            size,
            created_at: meta.created().ok().map(DateTime::<Utc>::from),
            updated_at: meta.modified().ok().map(DateTime::<Utc>::from),
            index_status,
        })
    }
}

#[async_trait]
impl ResourceLister for LocalDirLister {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn list_children(
        &self,
        _connection: &ConnectionId,
        request: &ListRequest,
    ) -> AppResult<ListPage> {
        let dir = self.resolve(request.resource_id.as_ref())?;
        let mut entries = fs::read_dir(&dir).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Folder not found: {}", dir.display()))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read folder: {}", dir.display()),
                    e,
                )
            }
        })?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            paths.push(entry.path());
        }
        // read_dir order is unspecified; cursors are offsets into the sorted list.
        paths.sort();

        let offset = match request.cursor.as_deref() {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| AppError::validation(format!("Invalid cursor: {cursor}")))?,
            None => 0,
        };
        let limit = request.limit.map(|l| l as usize).unwrap_or(paths.len());
        let end = offset.saturating_add(limit).min(paths.len());

        let mut data = Vec::new();
        for path in paths.iter().take(end).skip(offset) {
            match self.entry_node(path).await {
                Ok(node) => data.push(node),
                // Broken symlinks and permission errors are skipped.
                Err(e) => debug!(path = %path.display(), error = %e, "Skipping entry"),
            }
        }

        let next_cursor = (end < paths.len()).then(|| end.to_string());
        debug!(dir = %dir.display(), count = data.len(), ?next_cursor, "Listed folder");
        Ok(ListPage { data, next_cursor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn make_tree() -> (tempfile::TempDir, LocalDirLister) {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("docs/reports")).unwrap();
        std::fs::write(tmp.path().join("docs/reports/q1.pdf"), b"pdf").unwrap();
        std::fs::write(tmp.path().join("docs/readme.txt"), b"hello").unwrap();
        std::fs::write(tmp.path().join("top.md"), b"# top").unwrap();
        let lister = LocalDirLister::new(tmp.path().to_str().unwrap())
            .await
            .unwrap();
        (tmp, lister)
    }

    #[tokio::test]
    async fn test_root_listing() {
        let (_tmp, lister) = make_tree().await;
        let conn = ConnectionId::new("local");
        let page = lister
            .list_children(&conn, &ListRequest::default())
            .await
            .unwrap();
        let ids: Vec<&str> = page.data.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["docs", "top.md"]);
        assert!(page.data[0].is_folder());
        assert_eq!(page.data[1].size, Some(5));
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_nested_listing_uses_relative_ids() {
        let (_tmp, lister) = make_tree().await;
        let conn = ConnectionId::new("local");
        let request = ListRequest::first(Some(NodeId::new("docs")), 10);
        let page = lister.list_children(&conn, &request).await.unwrap();
        let ids: Vec<&str> = page.data.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["docs/readme.txt", "docs/reports"]);
        assert_eq!(page.data[0].path, "/docs/readme.txt");
    }

    #[tokio::test]
    async fn test_pagination_cursor() {
        let (_tmp, lister) = make_tree().await;
        let conn = ConnectionId::new("local");
        let first = ListRequest::first(None, 1);
        let page1 = lister.list_children(&conn, &first).await.unwrap();
        assert_eq!(page1.data.len(), 1);
        let cursor = page1.next_cursor.clone().expect("more pages");
        let page2 = lister
            .list_children(&conn, &first.next(cursor))
            .await
            .unwrap();
        assert_eq!(page2.data[0].id.as_str(), "top.md");
        assert!(page2.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_escape_rejected() {
        let (_tmp, lister) = make_tree().await;
        let conn = ConnectionId::new("local");
        let request = ListRequest::first(Some(NodeId::new("../etc")), 10);
        let err = lister.list_children(&conn, &request).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_missing_folder_is_not_found() {
        let (_tmp, lister) = make_tree().await;
        let conn = ConnectionId::new("local");
        let request = ListRequest::first(Some(NodeId::new("nope")), 10);
        let err = lister.list_children(&conn, &request).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
