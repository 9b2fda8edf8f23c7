//! Resource listing service trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::ConnectionId;
use crate::types::pagination::{ListPage, ListRequest};

/// The tree cache's sole data source.
///
/// Implementations must be idempotent: calling `list_children` repeatedly
/// with the same `resource_id` is always safe.
#[async_trait]
pub trait ResourceLister: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// List one page of the direct children of `request.resource_id`
    /// (the connection root when `None`).
    async fn list_children(
        &self,
        connection: &ConnectionId,
        request: &ListRequest,
    ) -> AppResult<ListPage>;
}
