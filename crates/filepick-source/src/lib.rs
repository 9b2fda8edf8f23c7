//! # filepick-source
//!
//! Collaborator implementations for FilePick:
//!
//! - **local**: a directory on disk exposed through the listing contract
//! - **memory**: fixture-backed listing and a simulated indexing service,
//!   used by the CLI demo mode and by tests
//!
//! The lister is selected at runtime based on configuration.

#[cfg(feature = "local")]
pub mod local;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;

pub use provider::build_lister;
