//! # filepick-core
//!
//! Core crate for FilePick. Contains the node model, typed identifiers,
//! filter/sorting/pagination types, configuration schemas, the traits for
//! the remote listing and indexing collaborators, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other FilePick crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
