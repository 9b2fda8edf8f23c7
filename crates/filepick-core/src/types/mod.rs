//! Core type definitions used across the FilePick workspace.

pub mod filter;
pub mod id;
pub mod node;
pub mod pagination;
pub mod sorting;
pub mod status;

pub use filter::{NodeFilter, StatusFilter, TypeFilter};
pub use id::*;
pub use node::{Node, NodeKind};
pub use pagination::{ListPage, ListRequest};
pub use sorting::{SortDirection, SortKey, SortSpec};
pub use status::IndexStatus;
