//! 32-byte node hash type.

use std::fmt;

use thiserror::Error;

use crate::keccak256;

/// Length of a node hash in bytes.
pub const HASH_LEN: usize = 32;

/// The Keccak-256 hash of a trie node's encoding or a contract's bytecode.
///
/// Node hashes are content addresses: the same value both names a node in the
/// trie and authenticates the bytes fetched for it from a peer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeHash([u8; HASH_LEN]);

/// Errors that can occur when building a hash from untrusted bytes.
#[derive(Debug, Error)]
pub enum HashError {
    /// The input has the wrong length.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

impl NodeHash {
    /// Creates a hash from a 32-byte array.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Creates a hash from a slice, returning an error if the length is wrong.
    ///
    /// # Errors
    ///
    /// Returns `HashError::InvalidLength` if the slice is not exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, HashError> {
        if bytes.len() != HASH_LEN {
            return Err(HashError::InvalidLength {
                expected: HASH_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; HASH_LEN];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Computes the hash of the given bytes.
    #[must_use]
    pub fn from_data(data: &[u8]) -> Self {
        Self(keccak256(data))
    }

    /// Returns the hash as a byte array.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Returns the hex-encoded representation of this hash.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for NodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for NodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHash({})", self)
    }
}

impl AsRef<[u8]> for NodeHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_LEN]> for NodeHash {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<NodeHash> for [u8; HASH_LEN] {
    fn from(hash: NodeHash) -> Self {
        hash.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let bytes = [42u8; 32];
        let hash = NodeHash::from_bytes(bytes);
        assert_eq!(hash.as_bytes(), &bytes);
    }

    #[test]
    fn test_from_slice() {
        let bytes = [42u8; 32];
        let hash = NodeHash::from_slice(&bytes).unwrap();
        assert_eq!(hash.as_bytes(), &bytes);

        // Wrong length should fail
        assert!(NodeHash::from_slice(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_from_data() {
        let hash = NodeHash::from_data(b"test");

        // Same input should produce the same hash
        assert_eq!(hash, NodeHash::from_data(b"test"));

        // Different input should produce a different hash
        assert_ne!(hash, NodeHash::from_data(b"other"));
    }

    #[test]
    fn test_display() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x12;
        bytes[1] = 0x34;
        let hash = NodeHash::from_bytes(bytes);
        assert!(hash.to_string().starts_with("0x1234"));
        assert!(hash.to_hex().starts_with("1234"));
    }

    #[test]
    fn test_ordering() {
        let a = NodeHash::from_bytes([0u8; 32]);
        let b = NodeHash::from_bytes([1u8; 32]);
        assert!(a < b);
    }
}
