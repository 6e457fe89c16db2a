use crate::types::NoteId;

/// Failure to establish the live subscription.
///
/// Surfaced to the user as a banner; there is no automatic retry. The
/// message string is the whole contract: callers decide presentation, and
/// this layer does not distinguish transient from permanent causes.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("No active session")]
    NoSession,

    #[error("Engine already started")]
    AlreadyStarted,

    #[error("Failed to subscribe: {0}")]
    Subscribe(String),
}

/// A rejected create, update, or delete.
///
/// Local state is left untouched on failure: the mirror only ever changes
/// via a delivered snapshot, so the UI never shows an unconfirmed write as
/// persisted. A failed mutation requires explicit user re-action.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("No active session")]
    NoSession,

    #[error("Note not found: {id}")]
    NotFound { id: NoteId },

    #[error("Write rejected: {0}")]
    Rejected(String),
}
