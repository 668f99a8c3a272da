//! Key-namespace wrapper.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::{Database, KeyValueReader, KeyValueWriter, Result};

/// A view of a database that keeps its keys under a private namespace.
///
/// The namespace tag is the SHA-256 of the label, so the tag has a fixed
/// width and two views can never collide, not even when one label is a
/// prefix of the other.
///
/// A view has no lifecycle of its own: it implements only the read and
/// write traits, and liveness questions belong to the shared database
/// underneath. Closing that database surfaces here as
/// [`DatabaseError::Closed`](crate::DatabaseError::Closed) from every call.
pub struct PrefixDb {
    tag: [u8; 32],
    db: Arc<dyn Database>,
}

impl PrefixDb {
    /// Creates a view over `db` namespaced by `label`.
    pub fn new(db: Arc<dyn Database>, label: &[u8]) -> Self {
        Self {
            tag: Sha256::digest(label).into(),
            db,
        }
    }

    fn tagged(&self, key: &[u8]) -> Vec<u8> {
        [&self.tag[..], key].concat()
    }
}

impl KeyValueReader for PrefixDb {
    fn has(&self, key: &[u8]) -> Result<bool> {
        self.db.has(&self.tagged(key))
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.db.get(&self.tagged(key))
    }
}

impl KeyValueWriter for PrefixDb {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.db.put(&self.tagged(key), value)
    }
}
