//! In-memory collaborators backed by a fixture tree.

mod indexer;
mod lister;

pub use indexer::MemoryIndexer;
pub use lister::{FixtureTree, MemoryLister};
