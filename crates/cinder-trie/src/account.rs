//! Account record codec.
//!
//! State-trie leaves carry RLP-encoded account records:
//! `[nonce, balance, storage_root, code_hash]`. The storage root and code
//! hash are the fan-out points into per-account storage tries and bytecode
//! blobs.

use alloy_primitives::U256;

use crate::hash::NodeHash;
use crate::rlp;
use crate::{EMPTY_CODE_HASH, EMPTY_ROOT};

/// An account as stored in the state trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Account nonce (transaction count).
    pub nonce: u64,
    /// Account balance in wei.
    pub balance: U256,
    /// Root of the account's storage trie (`EMPTY_ROOT` when storage-less).
    pub storage_root: NodeHash,
    /// Keccak-256 of the account's bytecode (`EMPTY_CODE_HASH` for EOAs).
    pub code_hash: NodeHash,
}

impl Account {
    /// Creates a new empty account.
    pub fn new() -> Self {
        Self {
            nonce: 0,
            balance: U256::ZERO,
            storage_root: EMPTY_ROOT,
            code_hash: EMPTY_CODE_HASH,
        }
    }

    /// Returns true if this account has contract code.
    pub fn has_code(&self) -> bool {
        self.code_hash != EMPTY_CODE_HASH
    }

    /// Returns true if this account has a non-empty storage trie.
    pub fn has_storage(&self) -> bool {
        self.storage_root != EMPTY_ROOT
    }

    /// Encodes the account as an RLP 4-list.
    pub fn encode(&self) -> Vec<u8> {
        let balance = self.balance.to_be_bytes::<32>();
        let items = vec![
            rlp::encode_bytes(strip_leading_zeros(&self.nonce.to_be_bytes())),
            rlp::encode_bytes(strip_leading_zeros(&balance)),
            rlp::encode_bytes(self.storage_root.as_bytes()),
            rlp::encode_bytes(self.code_hash.as_bytes()),
        ];
        rlp::encode_list(&items)
    }

    /// Decodes an account from an RLP 4-list.
    pub fn decode(data: &[u8]) -> Option<Self> {
        let items = rlp::decode_list(data)?;
        if items.len() != 4 {
            return None;
        }

        let nonce_bytes = rlp::decode_bytes(&items[0])?;
        if nonce_bytes.len() > 8 {
            return None;
        }
        let mut nonce = 0u64;
        for byte in &nonce_bytes {
            nonce = (nonce << 8) | u64::from(*byte);
        }

        let balance_bytes = rlp::decode_bytes(&items[1])?;
        if balance_bytes.len() > 32 {
            return None;
        }
        let balance = U256::from_be_slice(&balance_bytes);

        let storage_root = NodeHash::from_slice(&rlp::decode_bytes(&items[2])?).ok()?;
        let code_hash = NodeHash::from_slice(&rlp::decode_bytes(&items[3])?).ok()?;

        Some(Self {
            nonce,
            balance,
            storage_root,
            code_hash,
        })
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}

/// RLP integers are minimal big-endian: zero encodes as the empty string.
fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_account_roundtrip() {
        let account = Account::new();
        let decoded = Account::decode(&account.encode()).unwrap();
        assert_eq!(decoded, account);
        assert!(!decoded.has_code());
        assert!(!decoded.has_storage());
    }

    #[test]
    fn test_contract_account_roundtrip() {
        let account = Account {
            nonce: 1,
            balance: U256::from(1_000_000_000u64),
            storage_root: NodeHash::from_bytes([0x11; 32]),
            code_hash: NodeHash::from_bytes([0x22; 32]),
        };
        let decoded = Account::decode(&account.encode()).unwrap();
        assert_eq!(decoded, account);
        assert!(decoded.has_code());
        assert!(decoded.has_storage());
    }

    #[test]
    fn test_large_values_roundtrip() {
        let account = Account {
            nonce: u64::MAX,
            balance: U256::MAX,
            storage_root: NodeHash::from_bytes([0xab; 32]),
            code_hash: NodeHash::from_bytes([0xcd; 32]),
        };
        let decoded = Account::decode(&account.encode()).unwrap();
        assert_eq!(decoded, account);
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        // Not a list
        assert!(Account::decode(&[0x83, 1, 2, 3]).is_none());
        // Wrong item count
        let items = vec![
            crate::rlp::encode_bytes(&[1]),
            crate::rlp::encode_bytes(&[2]),
        ];
        assert!(Account::decode(&crate::rlp::encode_list(&items)).is_none());
        // Hash fields of the wrong width
        let items = vec![
            crate::rlp::encode_bytes(&[]),
            crate::rlp::encode_bytes(&[]),
            crate::rlp::encode_bytes(&[0x11; 16]),
            crate::rlp::encode_bytes(&[0x22; 32]),
        ];
        assert!(Account::decode(&crate::rlp::encode_list(&items)).is_none());
    }
}
