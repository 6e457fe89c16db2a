//! Local search and sidebar statistics over the note collection.
//!
//! Pure functions: the engine's mirror is the single source of note data
//! and these helpers never touch the store.

use crate::note::Note;

/// Counters shown alongside the note list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub total: usize,
    /// Notes with a reminder set (regardless of whether it is due).
    pub with_reminder: usize,
    /// Notes carrying at least one image.
    pub with_images: usize,
}

/// Case-insensitive substring match against title or content.
///
/// An empty query matches every note.
pub fn matches_query(note: &Note, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    note.title.to_lowercase().contains(&needle) || note.content.to_lowercase().contains(&needle)
}

/// Filter the collection by a search query, preserving list order.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    notes.iter().filter(|n| matches_query(n, query)).collect()
}

/// Count the sidebar statistics in one pass.
pub fn collection_stats(notes: &[Note]) -> CollectionStats {
    let mut stats = CollectionStats {
        total: notes.len(),
        ..Default::default()
    };
    for note in notes {
        if note.reminder_at.is_some() {
            stats.with_reminder += 1;
        }
        if note.has_images() {
            stats.with_images += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn note(title: &str, content: &str) -> Note {
        let now = Utc::now();
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            color: None,
            images: Vec::new(),
            reminder_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn query_matches_title_and_content_case_insensitively() {
        let n = note("Groceries", "Milk and Eggs");
        assert!(matches_query(&n, "groc"));
        assert!(matches_query(&n, "EGGS"));
        assert!(!matches_query(&n, "laundry"));
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(matches_query(&note("", ""), ""));
    }

    #[test]
    fn filter_preserves_order() {
        let notes = vec![note("b plan", ""), note("a", "plan"), note("c", "other")];
        let hits = filter_notes(&notes, "plan");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "b plan");
        assert_eq!(hits[1].title, "a");
    }

    #[test]
    fn stats_count_reminders_and_images() {
        let mut with_reminder = note("r", "");
        with_reminder.reminder_at = Some(Utc::now());
        let mut with_image = note("i", "");
        with_image.images.push("data:image/png;base64,xyz".to_string());

        let notes = vec![note("plain", ""), with_reminder, with_image];
        let stats = collection_stats(&notes);

        assert_eq!(
            stats,
            CollectionStats {
                total: 3,
                with_reminder: 1,
                with_images: 1,
            }
        );
    }
}
