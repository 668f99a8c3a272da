//! Database error type.

use thiserror::Error;

/// Failures a key-value store can report.
#[derive(Debug, Error, Clone)]
pub enum DatabaseError {
    /// An operation reached a database that was already shut down.
    #[error("operation on a closed database")]
    Closed,

    /// A stored value failed an integrity check on the way out.
    #[error("corrupt value: {0}")]
    Corruption(String),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
