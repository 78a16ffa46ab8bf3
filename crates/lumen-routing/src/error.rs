//! Error types for lumen-routing.

use thiserror::Error;

/// Result type for lumen-routing operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors that can occur when mutating a bucketed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// A computed bucket index fell outside the table.
    ///
    /// Unreachable through `bucket_index`, whose range is guaranteed, but
    /// every write path checks before touching a bucket so a future
    /// metric change can never scribble out of bounds.
    #[error("bucket index {bucket} outside table range 0..{limit}")]
    BucketOutOfRange { bucket: usize, limit: usize },
}
