//! Session context for the authenticated user.
//!
//! Identity itself is owned by the external provider; the engine only needs
//! the user id that scopes the note namespace. The embedding application
//! constructs a `Session` at login and drops it at logout.

use syncnotes_core::types::UserId;

/// The authenticated user's context, passed into
/// [`SyncEngine::start`](crate::sync::SyncEngine::start).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
}

impl Session {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// The namespace scope for this user's notes.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}
