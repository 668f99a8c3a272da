//! Key-value storage abstraction for the Cinder client.
//!
//! Two small traits split reading from writing, and [`Database`] combines
//! them with a lifecycle. Concrete pieces:
//!
//! - [`MemDb`]: in-memory store, used by tests and ephemeral state
//! - [`PrefixDb`]: a namespaced read/write view over a shared [`Database`]
//!
//! # Example
//!
//! ```
//! use cinder_db::{KeyValueReader, KeyValueWriter, MemDb};
//!
//! let db = MemDb::new();
//! db.put(b"key", b"value").unwrap();
//! assert_eq!(db.get(b"key").unwrap(), Some(b"value".to_vec()));
//! ```

mod error;
mod memdb;
mod prefixdb;

pub use error::{DatabaseError, Result};
pub use memdb::MemDb;
pub use prefixdb::PrefixDb;

/// A key-value reader.
pub trait KeyValueReader: Send + Sync {
    /// Returns whether the key exists in the database.
    fn has(&self, key: &[u8]) -> Result<bool>;

    /// Gets the value for the given key.
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
}

/// A key-value writer.
pub trait KeyValueWriter: Send + Sync {
    /// Sets the value for the given key.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;
}

/// A readable, writable store with a lifecycle.
pub trait Database: KeyValueReader + KeyValueWriter {
    /// Closes the database.
    fn close(&self) -> Result<()>;

    /// Returns whether the database is closed.
    fn is_closed(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memdb_basic_operations() {
        let db = MemDb::new();

        db.put(b"key1", b"value1").unwrap();
        assert_eq!(db.get(b"key1").unwrap(), Some(b"value1".to_vec()));

        assert!(db.has(b"key1").unwrap());
        assert!(!db.has(b"key2").unwrap());
    }

    #[test]
    fn test_dyn_database() {
        use std::sync::Arc;

        let db: Arc<dyn Database> = Arc::new(MemDb::new());
        db.put(b"key", b"value").unwrap();
        assert!(db.has(b"key").unwrap());
        db.close().unwrap();
        assert!(db.is_closed());
    }
}
