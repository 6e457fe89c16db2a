//! The document-store contract.

use async_trait::async_trait;
use tokio::sync::broadcast;

use syncnotes_core::note::{CreateNote, Note, UpdateNote};
use syncnotes_core::types::{NoteId, UserId};

/// Errors reported by the store collaborator.
///
/// The engine maps these onto its two user-visible kinds; transient and
/// permanent failures are deliberately not distinguished here, both end
/// up as a message string for the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The document does not exist in the given scope.
    #[error("Document not found: {id}")]
    NotFound { id: NoteId },

    /// The caller may not access the given scope.
    #[error("Permission denied for scope {scope}")]
    PermissionDenied { scope: UserId },

    /// The store rejected the operation or is unreachable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A complete ordered result set, delivered in response to any change.
///
/// Notes are ordered by `updated_at` descending. The store owns the
/// ordering guarantee; subscribers never re-sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub notes: Vec<Note>,
}

/// One delivery on a live subscription.
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
    /// The scope changed; this is the full new result set.
    Snapshot(Snapshot),
    /// The stream failed. No further snapshots will be delivered.
    Failed(String),
}

/// A live subscription to one user's note namespace.
///
/// The result set current at subscribe time is handed over synchronously
/// in `initial`; every subsequent change arrives on `events`. Dropping the
/// receiver unsubscribes.
pub struct NoteSubscription {
    pub initial: Snapshot,
    pub events: broadcast::Receiver<SnapshotEvent>,
}

/// Contract for the hosted document database, scoped per user namespace.
#[async_trait]
pub trait NoteStore: Send + Sync + 'static {
    /// Open a live subscription to `scope`'s notes.
    fn subscribe(&self, scope: &UserId) -> Result<NoteSubscription, StoreError>;

    /// Create a document, returning the store-assigned id.
    async fn create(&self, scope: &UserId, doc: CreateNote) -> Result<NoteId, StoreError>;

    /// Apply a partial document to an existing note.
    ///
    /// Fails with [`StoreError::NotFound`] when `id` does not exist in
    /// `scope`.
    async fn update(&self, scope: &UserId, id: NoteId, patch: UpdateNote)
        -> Result<(), StoreError>;

    /// Delete a document.
    ///
    /// Idempotent: deleting an id that is already absent succeeds and
    /// publishes no snapshot.
    async fn delete(&self, scope: &UserId, id: NoteId) -> Result<(), StoreError>;
}
