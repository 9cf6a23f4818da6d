//! Convenience result type alias for imagedit.

use crate::error::AppError;

/// A specialized `Result` type for imagedit operations.
pub type AppResult<T> = Result<T, AppError>;
