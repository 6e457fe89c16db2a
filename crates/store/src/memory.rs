//! In-process reference implementation of the store contract.
//!
//! Backed by a per-scope note map and a `tokio::sync::broadcast` channel:
//! every mutation rebuilds the full ordered result set and fans it out to
//! all live subscribers of that scope, which is exactly the observable
//! behavior of the hosted store's live queries. Scopes are fully isolated
//! from each other.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use syncnotes_core::note::{CreateNote, Note, UpdateNote};
use syncnotes_core::types::{NoteId, UserId};

use crate::contract::{NoteStore, NoteSubscription, Snapshot, SnapshotEvent, StoreError};

/// Buffer capacity of each scope's snapshot channel.
///
/// Snapshots carry the full state, so a lagged receiver can always skip
/// straight to the newest one without losing information.
const CHANNEL_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// One user's note namespace plus its snapshot fan-out channel.
struct Scope {
    notes: HashMap<NoteId, Note>,
    sender: broadcast::Sender<SnapshotEvent>,
}

impl Scope {
    fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            notes: HashMap::new(),
            sender,
        }
    }

    /// Current result set, ordered by `updated_at` descending. Equal
    /// timestamps are ordered by id so repeated snapshots stay stable.
    fn snapshot(&self) -> Snapshot {
        let mut notes: Vec<Note> = self.notes.values().cloned().collect();
        notes.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Snapshot { notes }
    }

    /// Fan the current snapshot out to all subscribers.
    fn publish(&self) {
        // A send error only means there are zero subscribers right now.
        let _ = self.sender.send(SnapshotEvent::Snapshot(self.snapshot()));
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory, broadcast-backed document store.
#[derive(Default)]
pub struct MemoryStore {
    scopes: Mutex<HashMap<UserId, Scope>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the scope for `user`, creating it on first touch.
    fn with_scope<T>(&self, user: &UserId, f: impl FnOnce(&mut Scope) -> T) -> T {
        let mut scopes = self.scopes.lock().expect("scope map lock");
        let scope = scopes
            .entry(user.clone())
            .or_insert_with(Scope::new);
        f(scope)
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    fn subscribe(&self, scope: &UserId) -> Result<NoteSubscription, StoreError> {
        self.with_scope(scope, |s| {
            Ok(NoteSubscription {
                initial: s.snapshot(),
                events: s.sender.subscribe(),
            })
        })
    }

    async fn create(&self, scope: &UserId, doc: CreateNote) -> Result<NoteId, StoreError> {
        let id = Uuid::new_v4();
        self.with_scope(scope, |s| {
            s.notes.insert(
                id,
                Note {
                    id,
                    title: doc.title,
                    content: doc.content,
                    color: doc.color,
                    images: doc.images,
                    reminder_at: doc.reminder_at,
                    created_at: doc.created_at,
                    updated_at: doc.updated_at,
                },
            );
            s.publish();
        });
        tracing::debug!(%id, %scope, "Document created");
        Ok(id)
    }

    async fn update(
        &self,
        scope: &UserId,
        id: NoteId,
        patch: UpdateNote,
    ) -> Result<(), StoreError> {
        self.with_scope(scope, |s| {
            let note = s.notes.get_mut(&id).ok_or(StoreError::NotFound { id })?;
            note.apply_update(&patch);
            s.publish();
            Ok(())
        })
    }

    async fn delete(&self, scope: &UserId, id: NoteId) -> Result<(), StoreError> {
        self.with_scope(scope, |s| {
            if s.notes.remove(&id).is_some() {
                s.publish();
            }
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use syncnotes_core::types::Timestamp;

    use super::*;

    fn doc(title: &str, updated_at: Timestamp) -> CreateNote {
        CreateNote {
            title: title.to_string(),
            content: String::new(),
            color: None,
            images: Vec::new(),
            reminder_at: None,
            created_at: updated_at,
            updated_at,
        }
    }

    fn scope() -> UserId {
        "user-1".to_string()
    }

    #[tokio::test]
    async fn snapshots_are_ordered_newest_first() {
        let store = MemoryStore::new();
        let t1 = Utc::now() - Duration::minutes(10);
        let t2 = Utc::now();

        let older = store.create(&scope(), doc("older", t1)).await.expect("create");
        let newer = store.create(&scope(), doc("newer", t2)).await.expect("create");

        let sub = store.subscribe(&scope()).expect("subscribe");
        let ids: Vec<NoteId> = sub.initial.notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![newer, older]);
    }

    #[tokio::test]
    async fn subscribers_receive_a_snapshot_on_every_change() {
        let store = MemoryStore::new();
        let mut sub = store.subscribe(&scope()).expect("subscribe");
        assert!(sub.initial.notes.is_empty());

        let id = store
            .create(&scope(), doc("fresh", Utc::now()))
            .await
            .expect("create");

        let event = sub.events.recv().await.expect("should receive");
        match event {
            SnapshotEvent::Snapshot(snapshot) => {
                assert_eq!(snapshot.notes.len(), 1);
                assert_eq!(snapshot.notes[0].id, id);
            }
            SnapshotEvent::Failed(message) => panic!("unexpected stream failure: {message}"),
        }
    }

    #[tokio::test]
    async fn update_bumps_note_to_the_top() {
        let store = MemoryStore::new();
        let t1 = Utc::now() - Duration::minutes(10);
        let t2 = Utc::now() - Duration::minutes(5);

        let first = store.create(&scope(), doc("first", t1)).await.expect("create");
        let second = store.create(&scope(), doc("second", t2)).await.expect("create");

        store
            .update(
                &scope(),
                first,
                UpdateNote {
                    title: Some("first, edited".to_string()),
                    updated_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        let sub = store.subscribe(&scope()).expect("subscribe");
        let ids: Vec<NoteId> = sub.initial.notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(sub.initial.notes[0].title, "first, edited");
    }

    #[tokio::test]
    async fn update_of_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let missing = Uuid::new_v4();

        let result = store
            .update(&scope(), missing, UpdateNote::default())
            .await;

        assert_matches!(result, Err(StoreError::NotFound { id }) if id == missing);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let id = store
            .create(&scope(), doc("short-lived", Utc::now()))
            .await
            .expect("create");

        store.delete(&scope(), id).await.expect("first delete");
        store.delete(&scope(), id).await.expect("second delete");

        let sub = store.subscribe(&scope()).expect("subscribe");
        assert!(sub.initial.notes.is_empty());
    }

    #[tokio::test]
    async fn scopes_are_isolated() {
        let store = MemoryStore::new();
        let alice = "alice".to_string();
        let bob = "bob".to_string();

        store
            .create(&alice, doc("alice's note", Utc::now()))
            .await
            .expect("create");

        let sub = store.subscribe(&bob).expect("subscribe");
        assert!(sub.initial.notes.is_empty());
    }
}
