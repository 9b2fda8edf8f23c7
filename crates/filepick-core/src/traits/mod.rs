//! Collaborator traits defined in `filepick-core` and implemented by
//! `filepick-source` (or by a real wire client).

pub mod indexing;
pub mod listing;

pub use indexing::{IndexHandle, IndexingService};
pub use listing::ResourceLister;
