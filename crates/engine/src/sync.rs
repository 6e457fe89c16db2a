//! The note synchronization engine.
//!
//! Keeps a local, reactive mirror of the session user's note collection and
//! translates UI intents into write-through store mutations. The mirror is
//! only ever updated from delivered snapshots: a mutation's visible effect
//! arrives with the next snapshot, never optimistically, so local and
//! remote state cannot diverge past an in-flight write. Last snapshot wins;
//! there is no merge logic.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use syncnotes_core::error::{SyncError, WriteError};
use syncnotes_core::note::{CreateNote, Note, NoteDraft, UpdateNote};
use syncnotes_core::palette;
use syncnotes_core::types::{NoteId, UserId};
use syncnotes_store::{NoteStore, SnapshotEvent, StoreError};

use crate::session::Session;

/// Connection state of the live mirror, surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Not started, or stopped.
    Idle,
    /// Mirroring the store.
    Live,
    /// The subscription stream failed. There is no automatic retry;
    /// recovering requires an explicit [`stop`](SyncEngine::stop) followed
    /// by a new [`start`](SyncEngine::start).
    Failed(String),
}

/// Outcome of a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// True when the deleted note was the selected one. The caller should
    /// clear its selection state in response; the engine never mutates UI
    /// state directly.
    pub clear_selection: bool,
}

/// The engine's one live subscription, exclusively owned.
struct Listener {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct EngineState {
    session: Option<Session>,
    selection: Option<NoteId>,
    listener: Option<Listener>,
}

// ---------------------------------------------------------------------------
// SyncEngine
// ---------------------------------------------------------------------------

/// Live mirror of one user's notes plus write-through mutations.
///
/// Reactive state is published through `watch` channels
/// ([`notes`](Self::notes), [`status`](Self::status)); the presentation
/// layer renders from those and owns no note data itself.
pub struct SyncEngine {
    store: Arc<dyn NoteStore>,
    notes_tx: watch::Sender<Vec<Note>>,
    status_tx: watch::Sender<SyncStatus>,
    state: Mutex<EngineState>,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        let (notes_tx, _) = watch::channel(Vec::new());
        let (status_tx, _) = watch::channel(SyncStatus::Idle);
        Self {
            store,
            notes_tx,
            status_tx,
            state: Mutex::new(EngineState::default()),
        }
    }

    /// Reactive view of the note collection, ordered by `updated_at`
    /// descending (the store's ordering, applied wholesale per snapshot).
    pub fn notes(&self) -> watch::Receiver<Vec<Note>> {
        self.notes_tx.subscribe()
    }

    /// Reactive view of the subscription state.
    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.status_tx.subscribe()
    }

    /// Open the live subscription for `session`'s notes.
    ///
    /// The snapshot current at subscribe time is applied before this
    /// returns; subsequent snapshots replace the collection wholesale as
    /// they arrive. Exactly one subscription may be active per engine: a
    /// second `start` without an intervening [`stop`](Self::stop) fails
    /// with [`SyncError::AlreadyStarted`] rather than silently leaking the
    /// prior one.
    ///
    /// Must be called from within a Tokio runtime: the listener runs as a
    /// spawned task.
    pub fn start(&self, session: Session) -> Result<(), SyncError> {
        let mut state = self.state.lock().expect("engine state lock");
        if state.listener.is_some() {
            return Err(SyncError::AlreadyStarted);
        }

        let subscription = self
            .store
            .subscribe(session.user_id())
            .map_err(|e| SyncError::Subscribe(e.to_string()))?;

        tracing::info!(user_id = %session.user_id(), "Subscription opened");
        self.notes_tx.send_replace(subscription.initial.notes);
        self.status_tx.send_replace(SyncStatus::Live);

        let cancel = CancellationToken::new();
        let task = tokio::spawn(listen(
            subscription.events,
            self.notes_tx.clone(),
            self.status_tx.clone(),
            cancel.clone(),
        ));

        state.session = Some(session);
        state.listener = Some(Listener { cancel, task });
        Ok(())
    }

    /// Tear down the live subscription and clear the mirror.
    ///
    /// Idempotent. Mutations already dispatched are not cancelled, but once
    /// the listener is gone their resulting snapshots are never observed.
    pub fn stop(&self) {
        let mut state = self.state.lock().expect("engine state lock");
        if let Some(listener) = state.listener.take() {
            // Cancel for the graceful path, abort so the receiver (and with
            // it the subscription) is released immediately.
            listener.cancel.cancel();
            listener.task.abort();
            tracing::info!("Subscription released");
        }
        state.session = None;
        state.selection = None;
        self.status_tx.send_replace(SyncStatus::Idle);
        self.notes_tx.send_replace(Vec::new());
    }

    /// Create a note from a draft.
    ///
    /// Trims title and content, assigns `created_at == updated_at == now`,
    /// and draws a palette color when the draft has none. Returns the
    /// store-assigned id once the write is acknowledged; the note itself
    /// appears in [`notes`](Self::notes) only with the next snapshot, never
    /// as an optimistic insert.
    pub async fn create_note(&self, draft: NoteDraft) -> Result<NoteId, WriteError> {
        let scope = self.current_scope().ok_or(WriteError::NoSession)?;
        let now = Utc::now();
        let doc = CreateNote {
            title: draft.title.trim().to_string(),
            content: draft.content.trim().to_string(),
            color: draft.color.or_else(|| Some(palette::random_color())),
            images: draft.images,
            reminder_at: draft.reminder_at,
            created_at: now,
            updated_at: now,
        };

        let id = self.store.create(&scope, doc).await.map_err(write_error)?;
        tracing::debug!(%id, "Note created");
        Ok(id)
    }

    /// Write changed fields of an existing note, refreshing `updated_at`.
    ///
    /// Patched title and content are trimmed. [`StoreError::NotFound`]
    /// surfaces as [`WriteError::NotFound`]; on any failure the mirror is
    /// left untouched.
    pub async fn update_note(&self, id: NoteId, mut patch: UpdateNote) -> Result<(), WriteError> {
        let scope = self.current_scope().ok_or(WriteError::NoSession)?;
        patch.title = patch.title.take().map(|t| t.trim().to_string());
        patch.content = patch.content.take().map(|c| c.trim().to_string());
        patch.updated_at = Some(Utc::now());

        self.store
            .update(&scope, id, patch)
            .await
            .map_err(write_error)?;
        tracing::debug!(%id, "Note updated");
        Ok(())
    }

    /// Delete a note.
    ///
    /// The returned outcome tells the caller whether the deleted note was
    /// the selected one. The engine clears its own selection record but
    /// leaves UI state to the caller.
    pub async fn delete_note(&self, id: NoteId) -> Result<DeleteOutcome, WriteError> {
        let scope = self.current_scope().ok_or(WriteError::NoSession)?;
        self.store.delete(&scope, id).await.map_err(write_error)?;

        let mut state = self.state.lock().expect("engine state lock");
        let clear_selection = state.selection == Some(id);
        if clear_selection {
            state.selection = None;
        }
        tracing::debug!(%id, clear_selection, "Note deleted");
        Ok(DeleteOutcome { clear_selection })
    }

    /// Record which note the presentation layer has selected.
    pub fn set_selection(&self, id: Option<NoteId>) {
        self.state.lock().expect("engine state lock").selection = id;
    }

    /// The engine's record of the selected note.
    pub fn selection(&self) -> Option<NoteId> {
        self.state.lock().expect("engine state lock").selection
    }

    fn current_scope(&self) -> Option<UserId> {
        self.state
            .lock()
            .expect("engine state lock")
            .session
            .as_ref()
            .map(|s| s.user_id().clone())
    }
}

/// Map a store failure onto the engine's write-error surface.
fn write_error(err: StoreError) -> WriteError {
    match err {
        StoreError::NotFound { id } => WriteError::NotFound { id },
        other => WriteError::Rejected(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Snapshot listener
// ---------------------------------------------------------------------------

/// Snapshot listener loop.
///
/// Replaces the mirror wholesale on every delivered snapshot. A lagged
/// receiver only skips stale snapshots; each snapshot carries the full
/// state, so catching up with the newest one is always correct.
async fn listen(
    mut events: broadcast::Receiver<SnapshotEvent>,
    notes_tx: watch::Sender<Vec<Note>>,
    status_tx: watch::Sender<SyncStatus>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Snapshot listener cancelled");
                break;
            }
            event = events.recv() => match event {
                Ok(SnapshotEvent::Snapshot(snapshot)) => {
                    notes_tx.send_replace(snapshot.notes);
                }
                Ok(SnapshotEvent::Failed(message)) => {
                    tracing::warn!(error = %message, "Subscription stream failed");
                    status_tx.send_replace(SyncStatus::Failed(message));
                    break;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Snapshot listener lagged, catching up");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!("Snapshot channel closed");
                    break;
                }
            }
        }
    }
}
