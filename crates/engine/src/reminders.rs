//! Reminder scheduler: session-scoped, best-effort alerting.
//!
//! Polls the engine's note mirror on a fixed period and raises an
//! at-most-once alert per note whose reminder time has elapsed. Nothing is
//! persisted: reloading the application resets both the seen-set and the
//! alert list.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use syncnotes_core::alert::NoteAlert;
use syncnotes_core::note::Note;
use syncnotes_core::types::{NoteId, Timestamp};

/// How often the scheduler checks for due reminders.
pub const REMINDER_POLL_INTERVAL: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// ReminderScheduler
// ---------------------------------------------------------------------------

/// Background service that raises reminder alerts from the note mirror.
///
/// Reads the collection through a `watch` receiver (read-only; the
/// scheduler never mutates notes) and publishes its alert list through
/// another, for the presentation layer to render and dismiss.
pub struct ReminderScheduler {
    notes: watch::Receiver<Vec<Note>>,
    alerts_tx: watch::Sender<Vec<NoteAlert>>,
    /// Note ids already alerted this session. Dismissing an alert does not
    /// remove its id, so a dismissed note is never re-alerted.
    alerted: Mutex<HashSet<NoteId>>,
    poll_interval: Duration,
}

impl ReminderScheduler {
    /// Create a scheduler reading the given note mirror.
    pub fn new(notes: watch::Receiver<Vec<Note>>) -> Self {
        let (alerts_tx, _) = watch::channel(Vec::new());
        Self {
            notes,
            alerts_tx,
            alerted: Mutex::new(HashSet::new()),
            poll_interval: REMINDER_POLL_INTERVAL,
        }
    }

    /// Override the poll period (tests and the demo binary).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Observable list of fired alerts, oldest first.
    ///
    /// Alerts stay listed until [`dismiss`](Self::dismiss)ed or until their
    /// note disappears from the collection.
    pub fn alerts(&self) -> watch::Receiver<Vec<NoteAlert>> {
        self.alerts_tx.subscribe()
    }

    /// Remove a note's alert from the list.
    ///
    /// The id stays in the seen-set, so the note is not re-alerted within
    /// this session.
    pub fn dismiss(&self, id: NoteId) {
        self.alerts_tx.send_if_modified(|alerts| {
            let before = alerts.len();
            alerts.retain(|a| a.id != id);
            alerts.len() != before
        });
    }

    /// Run the poll loop until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.poll_interval.as_secs(),
            "Reminder scheduler started"
        );
        let mut interval = tokio::time::interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Reminder scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    self.poll(Utc::now());
                }
            }
        }
    }

    /// One poll pass over the collection.
    ///
    /// A reminder edited to a new future time after it has fired does not
    /// re-arm: the seen-set is keyed by note id for the whole session.
    fn poll(&self, now: Timestamp) {
        let notes = self.notes.borrow().clone();
        let mut alerted = self.alerted.lock().expect("alerted set lock");

        let mut fired = Vec::new();
        for note in &notes {
            if note.reminder_due(now) && alerted.insert(note.id) {
                fired.push(NoteAlert::for_note(note));
            }
        }

        let live: HashSet<NoteId> = notes.iter().map(|n| n.id).collect();
        self.alerts_tx.send_if_modified(|alerts| {
            let before = alerts.len();
            // Deleted notes take their pending alerts with them.
            alerts.retain(|a| live.contains(&a.id));
            let changed = alerts.len() != before || !fired.is_empty();
            for alert in fired.drain(..) {
                tracing::info!(id = %alert.id, title = %alert.title, "Reminder due");
                alerts.push(alert);
            }
            changed
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;
    use uuid::Uuid;

    use syncnotes_core::alert::REMINDER_MESSAGE;

    use super::*;

    fn note(title: &str, reminder_at: Option<Timestamp>) -> Note {
        let now = Utc::now();
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: String::new(),
            color: None,
            images: Vec::new(),
            reminder_at,
            created_at: now,
            updated_at: now,
        }
    }

    fn elapsed() -> Option<Timestamp> {
        Some(Utc::now() - ChronoDuration::seconds(1))
    }

    #[test]
    fn due_reminder_fires_exactly_once() {
        let n = note("Stand-up", elapsed());
        let (_tx, rx) = watch::channel(vec![n.clone()]);
        let scheduler = ReminderScheduler::new(rx);

        scheduler.poll(Utc::now());
        scheduler.poll(Utc::now() + ChronoDuration::seconds(30));
        scheduler.poll(Utc::now() + ChronoDuration::seconds(60));

        let alerts = scheduler.alerts().borrow().clone();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, n.id);
        assert_eq!(alerts[0].title, "Stand-up");
        assert_eq!(alerts[0].message, REMINDER_MESSAGE);
    }

    #[test]
    fn future_reminder_does_not_fire_early() {
        let now = Utc::now();
        let n = note("Later", Some(now + ChronoDuration::minutes(5)));
        let (_tx, rx) = watch::channel(vec![n.clone()]);
        let scheduler = ReminderScheduler::new(rx);

        scheduler.poll(now);
        assert!(scheduler.alerts().borrow().is_empty());

        // Once the time passes, it fires.
        scheduler.poll(now + ChronoDuration::minutes(5));
        assert_eq!(scheduler.alerts().borrow().len(), 1);
    }

    #[test]
    fn notes_without_reminder_never_alert() {
        let (_tx, rx) = watch::channel(vec![note("Plain", None)]);
        let scheduler = ReminderScheduler::new(rx);

        scheduler.poll(Utc::now());
        assert!(scheduler.alerts().borrow().is_empty());
    }

    #[test]
    fn empty_title_alerts_as_untitled() {
        let (_tx, rx) = watch::channel(vec![note("", elapsed())]);
        let scheduler = ReminderScheduler::new(rx);

        scheduler.poll(Utc::now());
        assert_eq!(scheduler.alerts().borrow()[0].title, "Untitled");
    }

    #[test]
    fn dismissed_alert_is_not_rearmed() {
        let n = note("Once", elapsed());
        let (_tx, rx) = watch::channel(vec![n.clone()]);
        let scheduler = ReminderScheduler::new(rx);

        scheduler.poll(Utc::now());
        scheduler.dismiss(n.id);
        assert!(scheduler.alerts().borrow().is_empty());

        scheduler.poll(Utc::now() + ChronoDuration::seconds(30));
        assert!(scheduler.alerts().borrow().is_empty());
    }

    #[test]
    fn reminder_moved_to_the_future_after_firing_does_not_rearm() {
        let mut n = note("Moved", elapsed());
        let (tx, rx) = watch::channel(vec![n.clone()]);
        let scheduler = ReminderScheduler::new(rx);

        scheduler.poll(Utc::now());
        assert_eq!(scheduler.alerts().borrow().len(), 1);

        n.reminder_at = Some(Utc::now() + ChronoDuration::minutes(10));
        tx.send_replace(vec![n.clone()]);

        scheduler.poll(Utc::now() + ChronoDuration::minutes(11));
        assert_eq!(scheduler.alerts().borrow().len(), 1);
    }

    #[test]
    fn deleting_a_note_prunes_its_pending_alert() {
        let n = note("Doomed", elapsed());
        let (tx, rx) = watch::channel(vec![n.clone()]);
        let scheduler = ReminderScheduler::new(rx);

        scheduler.poll(Utc::now());
        assert_eq!(scheduler.alerts().borrow().len(), 1);

        tx.send_replace(Vec::new());
        scheduler.poll(Utc::now() + ChronoDuration::seconds(30));
        assert!(scheduler.alerts().borrow().is_empty());
    }
}
