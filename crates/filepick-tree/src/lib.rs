//! # filepick-tree
//!
//! The hierarchical tree-state engine. The client only ever knows part of
//! the remote tree; every component here works against that partial view:
//!
//! - [`cache`]: folder id to known direct children, plus loading flags
//! - [`navigation`]: breadcrumb frames and the displayed child list
//! - [`selection`]: tri-state selection propagation over the known tree
//! - [`filter`]: folder-scoped or global filtering and sorting
//! - [`loader`]: cursor-following folder fetches
//! - [`session`]: one browsing session tying the above to a listing service

pub mod cache;
pub mod filter;
pub mod loader;
pub mod navigation;
pub mod selection;
pub mod session;
pub mod state;

pub use cache::{FolderKey, TreeCache};
pub use navigation::{Frame, NavigationStack};
pub use selection::{Selection, TriState};
pub use session::BrowserSession;
pub use state::BrowserState;
