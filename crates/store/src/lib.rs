//! Document-store contract and the in-process reference implementation.
//!
//! The hosted document database behind SyncNotes is an external
//! collaborator; this crate pins down the slice of its API the engine
//! consumes:
//!
//! - [`NoteStore`] — create/update/delete plus a live snapshot
//!   subscription, scoped per user namespace.
//! - [`MemoryStore`] — an in-process implementation with the same
//!   observable behavior, used by tests and the demo binary.

pub mod contract;
pub mod memory;

pub use contract::{NoteStore, NoteSubscription, Snapshot, SnapshotEvent, StoreError};
pub use memory::MemoryStore;
