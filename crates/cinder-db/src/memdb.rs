//! In-memory database.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::{Database, DatabaseError, KeyValueReader, KeyValueWriter, Result};

/// An in-memory key-value database for tests and ephemeral state.
///
/// Entries live in a `HashMap` (nothing here iterates, so key order buys
/// nothing) behind a read-write lock, since existence probes far outnumber
/// writes in the workloads this backs. The closed state is the map being
/// gone: `close` drops it, which both frees the data and makes every later
/// call fail with [`DatabaseError::Closed`] without a separate flag to keep
/// in step.
#[derive(Debug)]
pub struct MemDb {
    entries: RwLock<Option<HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemDb {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Some(HashMap::new())),
        }
    }

    /// Number of stored entries; zero once closed.
    pub fn len(&self) -> usize {
        self.entries.read().as_ref().map_or(0, HashMap::len)
    }

    /// True when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemDb {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueReader for MemDb {
    fn has(&self, key: &[u8]) -> Result<bool> {
        let guard = self.entries.read();
        let entries = guard.as_ref().ok_or(DatabaseError::Closed)?;
        Ok(entries.contains_key(key))
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let guard = self.entries.read();
        let entries = guard.as_ref().ok_or(DatabaseError::Closed)?;
        Ok(entries.get(key).cloned())
    }
}

impl KeyValueWriter for MemDb {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut guard = self.entries.write();
        let entries = guard.as_mut().ok_or(DatabaseError::Closed)?;
        entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

impl Database for MemDb {
    fn close(&self) -> Result<()> {
        self.entries.write().take();
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.entries.read().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_has() {
        let db = MemDb::new();
        assert!(db.is_empty());

        db.put(b"one", b"1").unwrap();
        db.put(b"two", b"2").unwrap();

        assert_eq!(db.get(b"one").unwrap(), Some(b"1".to_vec()));
        assert_eq!(db.get(b"three").unwrap(), None);
        assert!(db.has(b"two").unwrap());
        assert!(!db.has(b"three").unwrap());
        assert_eq!(db.len(), 2);
    }

    #[test]
    fn test_put_overwrites() {
        let db = MemDb::new();

        db.put(b"key", b"old").unwrap();
        db.put(b"key", b"new").unwrap();

        assert_eq!(db.get(b"key").unwrap(), Some(b"new".to_vec()));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_close_drops_everything() {
        let db = MemDb::new();
        db.put(b"key", b"value").unwrap();

        assert!(!db.is_closed());
        db.close().unwrap();
        assert!(db.is_closed());
        assert_eq!(db.len(), 0);

        assert!(matches!(db.get(b"key"), Err(DatabaseError::Closed)));
        assert!(matches!(db.has(b"key"), Err(DatabaseError::Closed)));
        assert!(matches!(db.put(b"key", b"value"), Err(DatabaseError::Closed)));
    }
}
