//! Storage seam between the scheduler and the blockchain store.

use std::sync::Arc;

use cinder_db::{Database, DatabaseError, KeyValueReader, KeyValueWriter, PrefixDb, Result};
use cinder_trie::NodeHash;

/// Persistence interface the scheduler drives.
///
/// Reads double as existence probes: the scheduler checks them before
/// scheduling a fetch and on init to detect an already-synced root.
pub trait StateStore: Send + Sync {
    /// Returns a trie node's bytes, if stored.
    fn node(&self, hash: &NodeHash) -> Result<Option<Vec<u8>>>;

    /// Returns a code blob's bytes, if stored.
    fn code(&self, hash: &NodeHash) -> Result<Option<Vec<u8>>>;

    /// Durably writes a trie node, tagged with the block its state belongs to.
    fn put_node(&self, hash: &NodeHash, bytes: &[u8], block_number: u64) -> Result<()>;

    /// Durably writes a code blob.
    fn put_code(&self, hash: &NodeHash, bytes: &[u8]) -> Result<()>;

    /// Returns whether a trie node is stored.
    fn has_node(&self, hash: &NodeHash) -> Result<bool> {
        Ok(self.node(hash)?.is_some())
    }

    /// Returns whether a code blob is stored.
    fn has_code(&self, hash: &NodeHash) -> Result<bool> {
        Ok(self.code(hash)?.is_some())
    }
}

/// Width of the block-number tag prepended to stored node values.
const BLOCK_TAG_LEN: usize = 8;

/// [`StateStore`] over a shared key-value database.
///
/// Trie nodes and code blobs live in separate namespaces of one underlying
/// database. Node values carry an 8-byte big-endian block-number tag so the
/// store can prune state that falls out of its retention window; the tag is
/// stripped on read.
pub struct DbStateStore {
    nodes: PrefixDb,
    code: PrefixDb,
}

impl DbStateStore {
    /// Creates a store over the given database.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self {
            nodes: PrefixDb::new(db.clone(), b"state/nodes"),
            code: PrefixDb::new(db, b"state/code"),
        }
    }
}

impl StateStore for DbStateStore {
    fn node(&self, hash: &NodeHash) -> Result<Option<Vec<u8>>> {
        match self.nodes.get(hash.as_bytes())? {
            Some(value) if value.len() >= BLOCK_TAG_LEN => {
                Ok(Some(value[BLOCK_TAG_LEN..].to_vec()))
            }
            Some(_) => Err(DatabaseError::Corruption(format!(
                "truncated node value for {hash}"
            ))),
            None => Ok(None),
        }
    }

    fn code(&self, hash: &NodeHash) -> Result<Option<Vec<u8>>> {
        self.code.get(hash.as_bytes())
    }

    fn put_node(&self, hash: &NodeHash, bytes: &[u8], block_number: u64) -> Result<()> {
        let mut value = Vec::with_capacity(BLOCK_TAG_LEN + bytes.len());
        value.extend_from_slice(&block_number.to_be_bytes());
        value.extend_from_slice(bytes);
        self.nodes.put(hash.as_bytes(), &value)
    }

    fn put_code(&self, hash: &NodeHash, bytes: &[u8]) -> Result<()> {
        self.code.put(hash.as_bytes(), bytes)
    }

    fn has_node(&self, hash: &NodeHash) -> Result<bool> {
        self.nodes.has(hash.as_bytes())
    }

    fn has_code(&self, hash: &NodeHash) -> Result<bool> {
        self.code.has(hash.as_bytes())
    }
}
