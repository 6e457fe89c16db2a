//! Note synchronization engine and reminder scheduler.
//!
//! The client-side core of SyncNotes:
//!
//! - [`SyncEngine`] — keeps a live local mirror of the session user's note
//!   collection (via the store's snapshot subscription) and translates UI
//!   intents into write-through mutations.
//! - [`ReminderScheduler`] — polls the mirror on a fixed period and raises
//!   an at-most-once alert per note whose reminder time has elapsed.
//! - [`Session`] — the explicit authenticated-user context passed into
//!   [`SyncEngine::start`]; there is no ambient current-user global.

pub mod reminders;
pub mod session;
pub mod sync;

pub use reminders::ReminderScheduler;
pub use session::Session;
pub use sync::{DeleteOutcome, SyncEngine, SyncStatus};
