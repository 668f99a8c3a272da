//! The scheduler's bookkeeping state.
//!
//! Three structures, mutated only through the methods here:
//! - `active`: every hash that is still-to-be-fetched or fetched but not yet
//!   committable, keyed by hash
//! - `queue`: scheduled hashes not yet handed to the download loop, deepest
//!   first
//! - `batch`: committed writes awaiting a flush
//!
//! No I/O happens here; the state is a plain single-owner value.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use cinder_trie::NodeHash;

use crate::request::{PendingRequest, RequestKind};

/// A committed node or code blob waiting to be flushed.
#[derive(Debug, Clone)]
pub struct PendingWrite {
    /// Persistence path for the bytes.
    pub kind: RequestKind,
    /// The raw payload.
    pub bytes: Vec<u8>,
}

/// Fetch-queue entry. Deeper entries pop first; ties are broken by hash only
/// to make the order total, no stability is promised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    depth: usize,
    hash: NodeHash,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.depth
            .cmp(&other.depth)
            .then_with(|| self.hash.cmp(&other.hash))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The scheduler's pending requests, fetch queue and write batch.
#[derive(Debug, Default)]
pub struct SchedulerState {
    active: HashMap<NodeHash, PendingRequest>,
    queue: BinaryHeap<QueueEntry>,
    batch: HashMap<NodeHash, PendingWrite>,
}

impl SchedulerState {
    /// Creates an empty state.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a request.
    ///
    /// If the hash is already being tracked, the new request's parents are
    /// appended to the existing entry and nothing else changes: the fetch
    /// already in flight serves all parents, and no second queue entry is
    /// created.
    pub(crate) fn schedule(&mut self, req: PendingRequest) {
        match self.active.entry(req.hash) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().parents.extend(req.parents);
            }
            Entry::Vacant(slot) => {
                self.queue.push(QueueEntry {
                    depth: req.depth,
                    hash: req.hash,
                });
                slot.insert(req);
            }
        }
    }

    /// Pops up to `max` hashes from the fetch queue, deepest first.
    ///
    /// The requests stay in `active` awaiting their data. Entries can go
    /// stale: a request may have been fed (and possibly committed) by a
    /// response that arrived before the hash was ever handed out; such
    /// entries are dropped silently.
    pub(crate) fn take_missing(&mut self, max: usize) -> Vec<NodeHash> {
        let mut taken = Vec::with_capacity(max.min(self.queue.len()));
        while taken.len() < max {
            let Some(entry) = self.queue.pop() else {
                break;
            };
            if matches!(self.active.get(&entry.hash), Some(req) if req.data.is_none()) {
                taken.push(entry.hash);
            }
        }
        taken
    }

    /// Looks up a pending request.
    pub(crate) fn request(&self, hash: &NodeHash) -> Option<&PendingRequest> {
        self.active.get(hash)
    }

    /// Records the fetched payload for an active request.
    pub(crate) fn set_data(&mut self, hash: &NodeHash, data: Vec<u8>) {
        let req = self
            .active
            .get_mut(hash)
            .expect("data recorded for a hash without a pending request");
        req.data = Some(data);
    }

    /// Adds newly scheduled children to a request's dependency count.
    pub(crate) fn add_dependencies(&mut self, hash: &NodeHash, count: usize) {
        let req = self
            .active
            .get_mut(hash)
            .expect("dependencies added for a hash without a pending request");
        req.dependencies += count;
    }

    /// Commits a resolved request and cascades into its parents.
    ///
    /// The request must be active, carry data and have no unresolved
    /// children. It moves from `active` into `batch`; every occurrence of a
    /// parent in its parent list has its dependency count decremented, and a
    /// parent reaching zero commits the same way. Hashes form a DAG (a cycle
    /// would need a Keccak pre-image collision), so the cascade terminates.
    pub(crate) fn commit(&mut self, hash: NodeHash) {
        let mut ready = vec![hash];
        while let Some(hash) = ready.pop() {
            let req = self
                .active
                .remove(&hash)
                .expect("committed hash must have a pending request");
            let bytes = req.data.expect("committed request must carry data");
            self.batch.insert(
                hash,
                PendingWrite {
                    kind: req.kind,
                    bytes,
                },
            );
            for parent in req.parents {
                let entry = self
                    .active
                    .get_mut(&parent)
                    .expect("parent must stay pending until all its children commit");
                entry.dependencies -= 1;
                if entry.dependencies == 0 {
                    ready.push(parent);
                }
            }
        }
    }

    /// Whether a hash is already committed into the write batch.
    pub(crate) fn committed(&self, hash: &NodeHash) -> bool {
        self.batch.contains_key(hash)
    }

    /// Takes the write batch, leaving an empty one behind.
    pub(crate) fn take_batch(&mut self) -> HashMap<NodeHash, PendingWrite> {
        std::mem::take(&mut self.batch)
    }

    /// Number of scheduled hashes not yet handed to the download loop.
    pub fn missing_count(&self) -> usize {
        self.queue
            .iter()
            .filter(|entry| matches!(self.active.get(&entry.hash), Some(req) if req.data.is_none()))
            .count()
    }

    /// Number of fetched requests still waiting on children.
    pub fn pending_count(&self) -> usize {
        self.active.values().filter(|req| req.data.is_some()).count()
    }

    /// Number of committed writes awaiting a flush.
    pub fn queued_writes(&self) -> usize {
        self.batch.len()
    }

    /// True when nothing is awaited any more. The write batch may still hold
    /// entries; flush before verifying the root.
    pub fn is_done(&self) -> bool {
        self.active.is_empty()
    }
}
