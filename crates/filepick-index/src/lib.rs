//! # filepick-index
//!
//! Downstream batch operations over a browsing selection:
//!
//! - [`workflow`]: create an index, trigger a sync and poll its status a
//!   bounded number of times
//! - [`bulk`]: index or remove the current selection, writing statuses
//!   back into the session's tree

pub mod bulk;
pub mod workflow;

pub use bulk::{BulkReport, index_selection, remove_selection};
pub use workflow::{IndexOutcome, IndexWorkflow};
