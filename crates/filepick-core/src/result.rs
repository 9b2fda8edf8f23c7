//! Convenience result type alias for FilePick.

use crate::error::AppError;

/// A specialized `Result` type for FilePick operations.
pub type AppResult<T> = Result<T, AppError>;
