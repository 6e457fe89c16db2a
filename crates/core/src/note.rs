//! Note entity and its write DTOs.
//!
//! Documents serialize with camelCase field names, the wire format shared
//! with the hosted store and the browser presentation layer. `reminder_at`
//! always serializes on the entity (as an explicit `null` when absent) so
//! that "reminder removed" stays distinguishable from a field that was
//! never written.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{NoteId, Timestamp};

/// Title shown for a note whose own title is empty.
pub const UNTITLED: &str = "Untitled";

/// Maximum number of characters in a list preview of the content.
const PREVIEW_LEN: usize = 100;

// ---------------------------------------------------------------------------
// Note
// ---------------------------------------------------------------------------

/// A persisted note, scoped to one user's namespace in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Display color from the fixed palette, assigned at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Inline-encoded image payloads (data URLs), in display order.
    #[serde(default)]
    pub images: Vec<String>,
    /// When the user wants to be reminded. An explicit `null` in the
    /// document means the reminder was removed.
    pub reminder_at: Option<Timestamp>,
    pub created_at: Timestamp,
    /// Refreshed on every write; descending `updated_at` orders the list.
    pub updated_at: Timestamp,
}

impl Note {
    /// Title for display, falling back to [`UNTITLED`].
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    /// Content preview for list views, truncated to [`PREVIEW_LEN`]
    /// characters on a char boundary.
    pub fn preview(&self) -> String {
        match self.content.char_indices().nth(PREVIEW_LEN) {
            Some((at, _)) => format!("{}...", &self.content[..at]),
            None => self.content.clone(),
        }
    }

    /// Reminder-eligible: a reminder is set and not later than `now`.
    pub fn reminder_due(&self, now: Timestamp) -> bool {
        self.reminder_at.is_some_and(|at| at <= now)
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    /// Apply a partial document, field by field.
    ///
    /// `None` fields are left unchanged. The doubly-optional `reminder_at`
    /// distinguishes "leave alone" (outer `None`) from "clear" (`Some(None)`).
    pub fn apply_update(&mut self, patch: &UpdateNote) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(color) = &patch.color {
            self.color = Some(color.clone());
        }
        if let Some(images) = &patch.images {
            self.images = images.clone();
        }
        if let Some(reminder_at) = patch.reminder_at {
            self.reminder_at = reminder_at;
        }
        if let Some(updated_at) = patch.updated_at {
            self.updated_at = updated_at;
        }
    }
}

// ---------------------------------------------------------------------------
// Write DTOs
// ---------------------------------------------------------------------------

/// UI intent for a note that has not been saved yet.
///
/// Carries no id by construction: a draft exists only in local state until
/// the first save, when the store assigns one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub reminder_at: Option<Timestamp>,
}

/// The full document the engine sends to the store for a create.
///
/// The engine fills `color` (from the palette when the draft has none) and
/// sets `created_at == updated_at` to the creation instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNote {
    pub title: String,
    pub content: String,
    pub color: Option<String>,
    pub images: Vec<String>,
    pub reminder_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Partial document for an update: only changed fields are written, plus
/// the refreshed `updated_at`.
///
/// `reminder_at` is doubly optional: absent means unchanged, an explicit
/// `null` clears the reminder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub reminder_at: Option<Option<Timestamp>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

/// Deserialize a field where presence and nullability carry distinct
/// meaning: a present `null` becomes `Some(None)`, an absent field stays
/// `None` via `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
