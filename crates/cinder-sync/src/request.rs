//! Request bookkeeping records.

use cinder_trie::NodeHash;

/// What a fetched blob is. The kind decides how the payload is interpreted
/// and which store it is persisted through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// A node of the account trie.
    StateNode,
    /// A node of a per-account storage trie.
    StorageNode,
    /// A contract bytecode blob. Code is a leaf of the dependency graph: it
    /// is never decoded and never spawns children.
    Code,
}

/// A payload delivered by the download loop.
#[derive(Debug, Clone)]
pub struct NodeResponse {
    /// The hash the payload was fetched for.
    pub hash: NodeHash,
    /// The raw bytes.
    pub data: Vec<u8>,
}

impl NodeResponse {
    /// Creates a new response.
    pub fn new(hash: NodeHash, data: Vec<u8>) -> Self {
        Self { hash, data }
    }
}

/// Bookkeeping for one hash that is known to be needed but not yet durable.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// The awaited hash.
    pub hash: NodeHash,
    /// Raw bytes, present once a response has been accepted.
    pub data: Option<Vec<u8>>,
    /// How to interpret and persist the payload.
    pub kind: RequestKind,
    /// Hashes of requests waiting on this one. Duplicates are kept: a parent
    /// referencing the same child through two branch slots appears here twice
    /// and is decremented twice when the child commits.
    pub parents: Vec<NodeHash>,
    /// Nibble depth in the trie (root = 0). An extension advances the depth
    /// of its child by the shared-key length, not by one.
    pub depth: usize,
    /// Count of unresolved children spawned by this request.
    pub dependencies: usize,
}

impl PendingRequest {
    /// The initial request for a sync target root.
    pub fn root(hash: NodeHash) -> Self {
        Self {
            hash,
            data: None,
            kind: RequestKind::StateNode,
            parents: Vec::new(),
            depth: 0,
            dependencies: 0,
        }
    }

    /// A child request discovered while processing `parent`.
    pub fn child(hash: NodeHash, kind: RequestKind, parent: NodeHash, depth: usize) -> Self {
        Self {
            hash,
            data: None,
            kind,
            parents: vec![parent],
            depth,
            dependencies: 0,
        }
    }
}
