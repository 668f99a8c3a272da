//! Merkle Patricia Trie primitives for the Cinder client.
//!
//! This crate holds the pieces of the trie the sync layer needs without
//! pulling in the full trie write path:
//! - 32-byte node hashes and the Keccak-256 helper that produces them
//! - nibble sequences with hex-prefix encoding per the Ethereum Yellow Paper
//! - the RLP node codec (Branch / Extension / Leaf, plus bare references)
//! - the RLP account codec (nonce, balance, storage root, code hash)

mod account;
mod hash;
mod nibbles;
mod node;
mod rlp;

pub use account::Account;
pub use hash::{HashError, NodeHash, HASH_LEN};
pub use nibbles::Nibbles;
pub use node::{BranchNode, ExtensionNode, LeafNode, Node, NodeRef};

use sha3::{Digest, Keccak256};

/// Hash a value using Keccak-256.
pub fn keccak256(data: &[u8]) -> [u8; HASH_LEN] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// The empty trie root hash (keccak256 of the RLP empty string).
pub const EMPTY_ROOT: NodeHash = NodeHash::from_bytes([
    0x56, 0xe8, 0x1f, 0x17, 0x1b, 0xcc, 0x55, 0xa6, 0xff, 0x83, 0x45, 0xe6, 0x92, 0xc0, 0xf8,
    0x6e, 0x5b, 0x48, 0xe0, 0x1b, 0x99, 0x6c, 0xad, 0xc0, 0x01, 0x62, 0x2f, 0xb5, 0xe3, 0x63,
    0xb4, 0x21,
]);

/// The empty code hash (keccak256 of the empty byte string).
pub const EMPTY_CODE_HASH: NodeHash = NodeHash::from_bytes([
    0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c, 0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03,
    0xc0, 0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b, 0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85,
    0xa4, 0x70,
]);

/// Maximum depth of the trie in nibbles (32-byte keys, two nibbles per byte).
pub const MAX_TRIE_DEPTH: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_root() {
        // Empty RLP string is 0x80
        let hash = keccak256(&[0x80]);
        assert_eq!(NodeHash::from_bytes(hash), EMPTY_ROOT);
    }

    #[test]
    fn test_empty_code_hash() {
        let hash = keccak256(b"");
        assert_eq!(NodeHash::from_bytes(hash), EMPTY_CODE_HASH);
    }
}
