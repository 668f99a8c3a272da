//! Error types for state sync.

use cinder_db::DatabaseError;
use cinder_trie::NodeHash;
use thiserror::Error;

/// Errors that abort a sync.
///
/// Each of these means either a misbehaving peer (structurally malformed
/// payloads) or a failing local store. The driver is expected to drop the
/// scheduler and restart against a different peer; retrying the same
/// response batch is never valid.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The payload for a requested trie node does not decode as an MPT node.
    #[error("cannot decode trie node {0}")]
    InvalidNode(NodeHash),

    /// A state-trie leaf value does not decode as an account record.
    #[error("state leaf {0} does not carry a valid account")]
    InvalidAccount(NodeHash),

    /// The local store failed.
    #[error("store error: {0}")]
    Store(#[from] DatabaseError),
}

/// Benign response rejections.
///
/// Protocol noise that a well-behaved download loop never produces (it only
/// delivers what it was asked for, once), but that must not abort the sync.
/// The scheduler logs and discards these; they are never surfaced through
/// the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The hash is not being awaited.
    #[error("no pending request for {0}")]
    NotRequested(NodeHash),

    /// A payload for this hash was already accepted.
    #[error("request {0} already carries data")]
    AlreadyProcessed(NodeHash),
}
