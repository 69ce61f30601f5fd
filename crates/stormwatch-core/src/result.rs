//! Convenience result type alias for Stormwatch.

use crate::error::AppError;

/// A specialized `Result` type for Stormwatch operations.
pub type AppResult<T> = Result<T, AppError>;
