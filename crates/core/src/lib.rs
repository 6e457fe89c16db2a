//! Shared types and pure domain logic for SyncNotes.
//!
//! Everything the synchronization engine, the store contract, and the
//! presentation layer agree on lives here:
//!
//! - [`Note`] and its write DTOs ([`NoteDraft`], [`CreateNote`],
//!   [`UpdateNote`]).
//! - [`NoteAlert`] — the record raised when a reminder fires.
//! - [`SyncError`] / [`WriteError`] — the two user-visible failure kinds.
//! - The fixed color [`palette`] and local [`search`] helpers.
//!
//! This crate has no internal dependencies so every other crate can depend
//! on it.

pub mod alert;
pub mod error;
pub mod note;
pub mod palette;
pub mod search;
pub mod types;

pub use alert::NoteAlert;
pub use error::{SyncError, WriteError};
pub use note::{CreateNote, Note, NoteDraft, UpdateNote};
pub use types::{NoteId, Timestamp, UserId};
