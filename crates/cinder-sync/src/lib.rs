//! Trie state-sync scheduler.
//!
//! Given a target state root the local node does not yet hold, this crate
//! schedules the download of every trie node and contract bytecode blob
//! reachable from that root, and persists them so that no node is written
//! before all of its children are durable.
//!
//! # Protocol Overview
//!
//! 1. **Init**: the scheduler starts with a single pending request for the
//!    target root (or reports there is nothing to do).
//!
//! 2. **Pull**: the download loop drains missing hashes with
//!    [`SyncScheduler::take_missing`] and fetches them from peers, as wide
//!    and as parallel as it likes.
//!
//! 3. **Push**: fetched payloads come back through
//!    [`SyncScheduler::process_responses`]. Each decoded node fans out into
//!    child requests; a node whose children are all durable commits into the
//!    write batch, cascading into any parent that was only waiting on it.
//!
//! 4. **Flush**: [`SyncScheduler::flush`] drains the write batch into the
//!    store. Once [`SyncScheduler::is_done`] reports true and a final flush
//!    ran, the caller owns verifying the root.
//!
//! # Architecture
//!
//! ```text
//! download loop (owns all I/O, retries, peer choice)
//!    │                                        ▲
//!    │ take_missing()                         │ hashes to fetch
//!    ▼                                        │
//! SyncScheduler ──────────────────────────────┘
//!    │
//!    ├─► process_responses(): decode, fan out children, commit + cascade
//!    │
//!    └─► flush(block): write batch → node store / code store
//! ```
//!
//! The scheduler itself is synchronous and single-owner: every operation is
//! a plain mutation of [`SchedulerState`] behind `&mut self`, so reasoning
//! about it never involves the I/O layer. Deeper requests are handed out
//! first, which finishes subtrees early and keeps the in-flight working set
//! small.

mod error;
mod request;
mod scheduler;
mod state;
mod store;

pub use error::{Rejection, SyncError};
pub use request::{NodeResponse, PendingRequest, RequestKind};
pub use scheduler::SyncScheduler;
pub use state::{PendingWrite, SchedulerState};
pub use store::{DbStateStore, StateStore};
