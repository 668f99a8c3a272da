//! The sync engine: pulls missing hashes out, folds responses in, commits
//! resolved subtrees and flushes them to the store.

use std::sync::Arc;

use tracing::{debug, info};

use cinder_trie::{Account, Node, NodeHash, NodeRef, EMPTY_ROOT, MAX_TRIE_DEPTH};

use crate::error::{Rejection, SyncError};
use crate::request::{NodeResponse, PendingRequest, RequestKind};
use crate::state::SchedulerState;
use crate::store::StateStore;

/// Outcome of applying one response.
enum ResponseError {
    /// Abort the whole batch.
    Fatal(SyncError),
    /// Drop the response, keep going.
    Benign(Rejection),
}

/// Drives the download of all trie nodes and code blobs reachable from a
/// target state root.
///
/// The scheduler performs no I/O of its own beyond store probes and writes
/// through [`StateStore`]; fetching is the caller's job. All operations
/// mutate single-owner state behind `&mut self`, so a driver can fan out
/// network requests as widely as it likes as long as it serializes calls
/// into the scheduler.
pub struct SyncScheduler<S> {
    store: Arc<S>,
    state: SchedulerState,
}

impl<S: StateStore> SyncScheduler<S> {
    /// Starts a sync towards `target_root`.
    ///
    /// Returns `Ok(None)` when there is nothing to fetch: the target is the
    /// empty-trie root, or the store already holds a node under it.
    pub fn new(store: Arc<S>, target_root: NodeHash) -> Result<Option<Self>, SyncError> {
        if target_root == EMPTY_ROOT {
            return Ok(None);
        }
        if store.has_node(&target_root)? {
            return Ok(None);
        }

        info!(root = %target_root, "starting state sync");

        let mut state = SchedulerState::new();
        state.schedule(PendingRequest::root(target_root));
        Ok(Some(Self { store, state }))
    }

    /// Pops up to `max` hashes to fetch, deepest subtrees first.
    pub fn take_missing(&mut self, max: usize) -> Vec<NodeHash> {
        self.state.take_missing(max)
    }

    /// Pops every hash currently waiting to be fetched.
    pub fn take_all_missing(&mut self) -> Vec<NodeHash> {
        self.state.take_missing(usize::MAX)
    }

    /// Applies fetched payloads in order.
    ///
    /// Benign noise (payloads nobody asked for, duplicates) is logged and
    /// skipped. A malformed payload or a store failure aborts the batch; the
    /// scheduler must then be discarded and the sync restarted, typically
    /// against a different peer.
    pub fn process_responses(&mut self, responses: Vec<NodeResponse>) -> Result<(), SyncError> {
        for response in responses {
            match self.apply_response(response) {
                Ok(()) => {}
                Err(ResponseError::Benign(rejection)) => {
                    debug!(%rejection, "ignoring response");
                }
                Err(ResponseError::Fatal(err)) => return Err(err),
            }
        }
        Ok(())
    }

    fn apply_response(&mut self, response: NodeResponse) -> Result<(), ResponseError> {
        let (kind, depth, dependencies) = match self.state.request(&response.hash) {
            None => {
                return Err(ResponseError::Benign(Rejection::NotRequested(
                    response.hash,
                )))
            }
            Some(req) if req.data.is_some() => {
                return Err(ResponseError::Benign(Rejection::AlreadyProcessed(
                    response.hash,
                )))
            }
            Some(req) => (req.kind, req.depth, req.dependencies),
        };

        // Code blobs are opaque leaves: nothing to decode, nothing to wait on.
        if kind == RequestKind::Code {
            self.state.set_data(&response.hash, response.data);
            self.state.commit(response.hash);
            return Ok(());
        }

        // Everything fallible happens before the state is touched, so a bad
        // response leaves the scheduler exactly as it was.
        let node = Node::decode(&response.data)
            .ok_or(ResponseError::Fatal(SyncError::InvalidNode(response.hash)))?;
        let children = self
            .child_requests(&node, response.hash, kind, depth)
            .map_err(ResponseError::Fatal)?;

        self.state.set_data(&response.hash, response.data);
        if children.is_empty() && dependencies == 0 {
            self.state.commit(response.hash);
        } else {
            self.state.add_dependencies(&response.hash, children.len());
            for child in children {
                self.state.schedule(child);
            }
        }
        Ok(())
    }

    /// Computes the fetches a decoded node fans out into, skipping children
    /// whose bytes are already staged in the write batch or stored.
    ///
    /// Children already tracked in `active` are *not* skipped: scheduling
    /// them again merges the parent lists, and they still count toward this
    /// node's dependencies.
    fn child_requests(
        &self,
        node: &Node,
        parent: NodeHash,
        kind: RequestKind,
        depth: usize,
    ) -> Result<Vec<PendingRequest>, SyncError> {
        let mut children = Vec::new();

        match node {
            Node::Leaf(leaf) => {
                if kind == RequestKind::StateNode {
                    let account = Account::decode(&leaf.value)
                        .ok_or(SyncError::InvalidAccount(parent))?;
                    // Code and storage roots jump the queue: finishing a
                    // leaf's fan-out early lets its whole dependency chain
                    // drain out of the working set.
                    if account.has_code() {
                        children.push(PendingRequest::child(
                            account.code_hash,
                            RequestKind::Code,
                            parent,
                            MAX_TRIE_DEPTH,
                        ));
                    }
                    if account.has_storage() {
                        children.push(PendingRequest::child(
                            account.storage_root,
                            RequestKind::StorageNode,
                            parent,
                            MAX_TRIE_DEPTH,
                        ));
                    }
                }
                // Storage-trie leaves hold slot values; nothing fans out.
            }
            Node::Branch(branch) => {
                for child in &branch.children {
                    if let NodeRef::Hash(hash) = child {
                        children.push(PendingRequest::child(*hash, kind, parent, depth + 1));
                    }
                }
                // Inline children are already embedded in this payload.
            }
            Node::Extension(ext) => {
                if let NodeRef::Hash(hash) = &ext.child {
                    children.push(PendingRequest::child(
                        *hash,
                        kind,
                        parent,
                        depth + ext.path.len(),
                    ));
                }
            }
            // A bare reference or an empty payload fans out into nothing.
            Node::Hash(_) | Node::Empty => {}
        }

        let mut wanted = Vec::with_capacity(children.len());
        for child in children {
            if !self.already_persisted(&child)? {
                wanted.push(child);
            }
        }
        Ok(wanted)
    }

    /// Whether a candidate's bytes are already staged or durable.
    fn already_persisted(&self, candidate: &PendingRequest) -> Result<bool, SyncError> {
        if self.state.committed(&candidate.hash) {
            return Ok(true);
        }
        let stored = match candidate.kind {
            RequestKind::Code => self.store.has_code(&candidate.hash)?,
            RequestKind::StateNode | RequestKind::StorageNode => {
                self.store.has_node(&candidate.hash)?
            }
        };
        Ok(stored)
    }

    /// Drains the write batch into the store.
    ///
    /// Trie nodes are tagged with `block_number`; write order within the
    /// batch is unspecified. The storage invariant holds because a request
    /// only ever enters the batch after all of its children did.
    pub fn flush(&mut self, block_number: u64) -> Result<(), SyncError> {
        let batch = self.state.take_batch();
        let count = batch.len();
        for (hash, write) in batch {
            match write.kind {
                RequestKind::Code => self.store.put_code(&hash, &write.bytes)?,
                RequestKind::StateNode | RequestKind::StorageNode => {
                    self.store.put_node(&hash, &write.bytes, block_number)?
                }
            }
        }
        debug!(count, block_number, "flushed state-sync batch");
        Ok(())
    }

    /// Number of scheduled hashes not yet handed to the download loop.
    pub fn missing_count(&self) -> usize {
        self.state.missing_count()
    }

    /// Number of fetched requests still waiting on children.
    pub fn pending_count(&self) -> usize {
        self.state.pending_count()
    }

    /// Number of committed writes awaiting a flush.
    pub fn queued_writes(&self) -> usize {
        self.state.queued_writes()
    }

    /// True when nothing is awaited any more. Flush before verifying the
    /// root: the final writes may still sit in the batch.
    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    /// The bookkeeping state, for inspection.
    pub fn state(&self) -> &SchedulerState {
        &self.state
    }
}
