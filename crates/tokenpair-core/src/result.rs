//! Convenience result type alias for TokenPair.

use crate::error::AppError;

/// A specialized `Result` type for TokenPair operations.
pub type AppResult<T> = Result<T, AppError>;
