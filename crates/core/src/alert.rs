//! Reminder alert records surfaced to the presentation layer.

use serde::Serialize;

use crate::note::Note;
use crate::types::NoteId;

/// Message attached to every reminder alert.
pub const REMINDER_MESSAGE: &str = "Reminder time reached";

/// A single fired reminder.
///
/// Kept in the scheduler's observable list until dismissed or until the
/// note itself is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteAlert {
    /// The note whose reminder fired.
    pub id: NoteId,
    /// Display title at the time the alert fired.
    pub title: String,
    /// Human-readable alert message.
    pub message: String,
}

impl NoteAlert {
    /// Build the alert for a note whose reminder time has been reached.
    pub fn for_note(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.display_title().to_string(),
            message: REMINDER_MESSAGE.to_string(),
        }
    }
}
