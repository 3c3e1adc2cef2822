//! Optimistic list synchronization.
//!
//! A [`ListSync`] mirrors one collection of the record store in memory.
//! Mutations are applied locally first and the remote call runs as a spawned
//! task; when that call fails the whole collection is re-fetched, so the list
//! always converges on the store's copy.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::models::{ChecklistItem, Entity, RecordDefaults, RecordId};
use crate::store::{diff_documents, to_document, Document, RecordStore};

/// What a synchronizer is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    /// A fetch of the whole collection is in flight
    Loading,
    /// At least one optimistic write awaits the store
    Mutating,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Loading => f.write_str("loading"),
            Self::Mutating => f.write_str("mutating"),
        }
    }
}

/// Result of [`ListSync::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The collection was replaced with this many records
    Loaded(usize),
    /// The fetch failed; the previous contents were kept
    Failed,
}

/// How an optimistic write ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The store accepted the write
    Persisted,
    /// The store rejected the write and the list was reloaded
    Reverted,
}

/// Handle to the remote half of an optimistic write.
///
/// Dropping it does not cancel the write.
#[derive(Debug)]
pub struct PendingWrite {
    id: RecordId,
    handle: JoinHandle<WriteOutcome>,
}

impl PendingWrite {
    /// Record the write applies to
    pub const fn id(&self) -> &RecordId {
        &self.id
    }

    /// Wait for the store to answer (and for any resulting reload).
    pub async fn settle(self) -> WriteOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(id = %self.id, %error, "Remote write task did not finish");
                WriteOutcome::Reverted
            }
        }
    }
}

struct ListState<E> {
    items: Vec<E>,
    awaiting_first_load: bool,
    loads_in_flight: usize,
    writes_in_flight: usize,
}

/// In-memory mirror of one collection with optimistic writes.
///
/// Clones share the same list. Mutating methods spawn onto the current Tokio
/// runtime and must be called from within one.
pub struct ListSync<E: Entity, S: RecordStore> {
    store: Arc<S>,
    state: Arc<Mutex<ListState<E>>>,
    defaults: Arc<RecordDefaults>,
    revision: Arc<watch::Sender<u64>>,
}

impl<E: Entity, S: RecordStore> Clone for ListSync<E, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            state: Arc::clone(&self.state),
            defaults: Arc::clone(&self.defaults),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<E: Entity, S: RecordStore> ListSync<E, S> {
    /// Create an empty synchronizer. Call [`Self::load`] to populate it.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_defaults(store, RecordDefaults::default())
    }

    pub fn with_defaults(store: Arc<S>, defaults: RecordDefaults) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            store,
            state: Arc::new(Mutex::new(ListState {
                items: Vec::new(),
                awaiting_first_load: true,
                loads_in_flight: 0,
                writes_in_flight: 0,
            })),
            defaults: Arc::new(defaults),
            revision: Arc::new(revision),
        }
    }

    /// Snapshot of the collection in display order
    pub fn items(&self) -> Vec<E> {
        self.state.lock().items.clone()
    }

    pub fn get(&self, id: &RecordId) -> Option<E> {
        self.state
            .lock()
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// True until the first load finishes, whether it succeeded or not
    pub fn is_loading(&self) -> bool {
        self.state.lock().awaiting_first_load
    }

    pub fn phase(&self) -> SyncPhase {
        let state = self.state.lock();
        if state.loads_in_flight > 0 {
            SyncPhase::Loading
        } else if state.writes_in_flight > 0 {
            SyncPhase::Mutating
        } else {
            SyncPhase::Idle
        }
    }

    /// Watch the revision counter, bumped after every change to the list.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Replace the collection with the store's copy.
    ///
    /// Failures are logged and leave the current contents untouched.
    pub async fn load(&self) -> LoadOutcome {
        self.state.lock().loads_in_flight += 1;
        self.run_load().await
    }

    /// Optimistically add a record built from `draft`.
    ///
    /// Returns `None` without touching the list or the store when the draft
    /// is missing a required field.
    pub fn create(&self, draft: E::Draft) -> Option<PendingWrite> {
        let record = E::from_draft(RecordId::generate(), draft, &self.defaults)?;
        let document = match to_document(&record) {
            Ok(document) => document,
            Err(error) => {
                tracing::error!(collection = E::COLLECTION, %error, "Cannot encode new record");
                return None;
            }
        };
        let id = record.id().clone();

        {
            let mut state = self.state.lock();
            if E::SORTED {
                state.items.push(record);
                E::canonical_order(&mut state.items);
            } else {
                state.items.insert(0, record);
            }
            state.writes_in_flight += 1;
        }
        self.notify();
        tracing::debug!(collection = E::COLLECTION, %id, "Created record locally");

        let sync = self.clone();
        let write_id = id.clone();
        let handle = tokio::spawn(async move {
            let result = sync
                .store
                .create(E::COLLECTION, document)
                .await
                .map(|_| ());
            sync.finish_write("create", &write_id, result).await
        });
        Some(PendingWrite { id, handle })
    }

    /// Optimistically apply `patch` to the record with `id`.
    ///
    /// Only the changed fields are sent to the store. Returns `None` when no
    /// record has that id.
    pub fn update(&self, id: &RecordId, patch: E::Patch) -> Option<PendingWrite> {
        self.modify(id, "update", |record| record.apply_patch(patch))
    }

    /// Optimistically remove the record with `id`; `None` when it is absent.
    pub fn delete(&self, id: &RecordId) -> Option<PendingWrite> {
        {
            let mut state = self.state.lock();
            let index = state.items.iter().position(|item| item.id() == id)?;
            state.items.remove(index);
            state.writes_in_flight += 1;
        }
        self.notify();

        let sync = self.clone();
        let write_id = id.clone();
        let handle = tokio::spawn(async move {
            let result = sync.store.delete(E::COLLECTION, write_id.as_str()).await;
            sync.finish_write("delete", &write_id, result).await
        });
        Some(PendingWrite {
            id: id.clone(),
            handle,
        })
    }

    fn modify(
        &self,
        id: &RecordId,
        action: &'static str,
        change: impl FnOnce(&mut E),
    ) -> Option<PendingWrite> {
        let partial = {
            let mut state = self.state.lock();
            let index = state.items.iter().position(|item| item.id() == id)?;
            let mut changed = state.items[index].clone();
            change(&mut changed);

            let partial = match changed_fields(&state.items[index], &changed) {
                Ok(partial) => partial,
                Err(error) => {
                    tracing::error!(collection = E::COLLECTION, %id, %error, "Cannot encode {action}");
                    return None;
                }
            };
            state.items[index] = changed;
            if E::SORTED {
                E::canonical_order(&mut state.items);
            }
            state.writes_in_flight += 1;
            partial
        };
        self.notify();

        let sync = self.clone();
        let write_id = id.clone();
        let handle = tokio::spawn(async move {
            let result = sync
                .store
                .update(E::COLLECTION, partial)
                .await
                .map(|_| ());
            sync.finish_write(action, &write_id, result).await
        });
        Some(PendingWrite {
            id: id.clone(),
            handle,
        })
    }

    async fn finish_write(
        &self,
        action: &'static str,
        id: &RecordId,
        result: Result<()>,
    ) -> WriteOutcome {
        match result {
            Ok(()) => {
                {
                    let mut state = self.state.lock();
                    state.writes_in_flight = state.writes_in_flight.saturating_sub(1);
                }
                self.notify();
                WriteOutcome::Persisted
            }
            Err(error) => {
                tracing::error!(
                    collection = E::COLLECTION,
                    %id,
                    %error,
                    "Remote {action} failed, reloading"
                );
                {
                    // Mutating hands over to Loading without passing through Idle
                    let mut state = self.state.lock();
                    state.loads_in_flight += 1;
                    state.writes_in_flight = state.writes_in_flight.saturating_sub(1);
                }
                self.run_load().await;
                WriteOutcome::Reverted
            }
        }
    }

    /// Fetch and install the collection; the caller has counted the load.
    async fn run_load(&self) -> LoadOutcome {
        let fetched = self.store.list_all(E::COLLECTION).await;

        let outcome = {
            let mut state = self.state.lock();
            state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
            state.awaiting_first_load = false;
            match fetched {
                Ok(documents) => {
                    let mut items = decode_documents::<E>(documents);
                    E::canonical_order(&mut items);
                    state.items = items;
                    Ok(state.items.len())
                }
                Err(error) => Err(error),
            }
        };
        self.notify();

        match outcome {
            Ok(count) => {
                tracing::debug!(collection = E::COLLECTION, count, "Loaded records");
                LoadOutcome::Loaded(count)
            }
            Err(error) => {
                tracing::error!(collection = E::COLLECTION, %error, "Failed to load records");
                LoadOutcome::Failed
            }
        }
    }

    fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

impl<S: RecordStore> ListSync<ChecklistItem, S> {
    /// Flip a task between pending and completed.
    ///
    /// The store receives only `_id`, `isCompleted` and `status`.
    pub fn toggle_complete(&self, id: &RecordId) -> Option<PendingWrite> {
        self.modify(id, "toggle", ChecklistItem::toggle)
    }
}

fn changed_fields<E: Entity>(before: &E, after: &E) -> Result<Document> {
    Ok(diff_documents(&to_document(before)?, &to_document(after)?))
}

/// Decode store documents, skipping any without a usable `_id`.
fn decode_documents<E: Entity>(documents: Vec<Document>) -> Vec<E> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document
                .get("_id")
                .and_then(Value::as_str)
                .unwrap_or("<missing>")
                .to_string();
            match serde_json::from_value(Value::Object(document)) {
                Ok(item) => Some(item),
                Err(error) => {
                    tracing::warn!(collection = E::COLLECTION, %id, %error, "Skipping malformed record");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ChecklistDraft, Guest, GuestDraft, GuestPatch, RsvpStatus, Vendor,
    };
    use crate::store::{FailureMode, MemoryStore};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn guest_draft(name: &str) -> GuestDraft {
        GuestDraft {
            guest_name: name.to_string(),
            ..GuestDraft::default()
        }
    }

    fn names(guests: &[Guest]) -> Vec<&str> {
        guests.iter().map(Guest::name).collect()
    }

    /// Wraps a memory store and records every update payload.
    #[derive(Default)]
    struct RecordingStore {
        inner: MemoryStore,
        updates: Mutex<Vec<Document>>,
    }

    #[async_trait]
    impl RecordStore for RecordingStore {
        async fn list_all(&self, collection: &str) -> Result<Vec<Document>> {
            self.inner.list_all(collection).await
        }

        async fn create(&self, collection: &str, document: Document) -> Result<Document> {
            self.inner.create(collection, document).await
        }

        async fn update(&self, collection: &str, partial: Document) -> Result<Document> {
            self.updates.lock().push(partial.clone());
            self.inner.update(collection, partial).await
        }

        async fn delete(&self, collection: &str, id: &str) -> Result<()> {
            self.inner.delete(collection, id).await
        }
    }

    #[tokio::test]
    async fn loading_flag_clears_once_even_on_failure() {
        let store = Arc::new(MemoryStore::new());
        store.set_failure_mode(FailureMode::Unreachable);
        let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
        assert!(guests.is_loading());

        assert_eq!(guests.load().await, LoadOutcome::Failed);
        assert!(!guests.is_loading());
        assert!(guests.is_empty());
        assert_eq!(guests.phase(), SyncPhase::Idle);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_items() {
        let store = Arc::new(MemoryStore::new());
        store.seed("guestlist", vec![doc(json!({"_id": "g1", "guestName": "Alex"}))]);
        let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
        assert_eq!(guests.load().await, LoadOutcome::Loaded(1));

        store.set_failure_mode(FailureMode::Unreachable);
        assert_eq!(guests.load().await, LoadOutcome::Failed);
        assert_eq!(names(&guests.items()), vec!["Alex"]);
    }

    #[tokio::test]
    async fn create_is_visible_before_the_store_answers() {
        let store = Arc::new(MemoryStore::new());
        let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
        guests.load().await;

        let first = guests.create(guest_draft("Alex")).unwrap();
        let second = guests.create(guest_draft("Blair")).unwrap();
        // current-thread runtime: spawned writes have not run yet
        assert_eq!(names(&guests.items()), vec!["Blair", "Alex"]);
        assert_eq!(guests.phase(), SyncPhase::Mutating);
        assert!(store.documents("guestlist").is_empty());

        assert_eq!(first.settle().await, WriteOutcome::Persisted);
        assert_eq!(second.settle().await, WriteOutcome::Persisted);
        assert_eq!(guests.phase(), SyncPhase::Idle);
        assert_eq!(store.documents("guestlist").len(), 2);
    }

    #[tokio::test]
    async fn blank_required_field_blocks_create() {
        let store = Arc::new(MemoryStore::new());
        let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
        let revisions = guests.subscribe();

        assert!(guests.create(guest_draft("   ")).is_none());
        assert!(guests.is_empty());
        assert_eq!(*revisions.borrow(), 0);
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn rejected_create_is_reverted_by_reload() {
        let store = Arc::new(MemoryStore::new());
        store.seed("guestlist", vec![doc(json!({"_id": "g1", "guestName": "Alex"}))]);
        let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
        guests.load().await;
        store.set_failure_mode(FailureMode::RejectWrites);

        let pending = guests.create(guest_draft("Blair")).unwrap();
        assert_eq!(names(&guests.items()), vec!["Blair", "Alex"]);

        assert_eq!(pending.settle().await, WriteOutcome::Reverted);
        assert_eq!(names(&guests.items()), vec!["Alex"]);
        assert_eq!(guests.phase(), SyncPhase::Idle);
    }

    #[tokio::test]
    async fn rejected_delete_restores_record() {
        let store = Arc::new(MemoryStore::new());
        store.seed("guestlist", vec![doc(json!({"_id": "g1", "guestName": "Alex"}))]);
        let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
        guests.load().await;
        store.set_failure_mode(FailureMode::RejectWrites);

        let id: RecordId = "g1".parse().unwrap();
        let pending = guests.delete(&id).unwrap();
        assert!(guests.get(&id).is_none());
        assert_eq!(pending.settle().await, WriteOutcome::Reverted);
        assert!(guests.get(&id).is_some());
    }

    #[tokio::test]
    async fn unknown_ids_are_ignored() {
        let store = Arc::new(MemoryStore::new());
        let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
        guests.load().await;
        let ghost: RecordId = "ghost".parse().unwrap();

        assert!(guests.update(&ghost, GuestPatch::default()).is_none());
        assert!(guests.delete(&ghost).is_none());
        assert_eq!(store.call_count(), 1);
    }

    #[tokio::test]
    async fn update_sends_only_changed_fields() {
        let store = Arc::new(RecordingStore::default());
        store.inner.seed(
            "guestlist",
            vec![doc(json!({
                "_id": "g1",
                "_createdDate": "2026-01-01T00:00:00Z",
                "guestName": "Alex",
                "rsvpStatus": "Pending",
                "hasPlusOne": true,
                "plusOneName": "Sam"
            }))],
        );
        let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
        guests.load().await;

        let id: RecordId = "g1".parse().unwrap();
        let pending = guests
            .update(
                &id,
                GuestPatch {
                    rsvp_status: Some(RsvpStatus::Confirmed),
                    plus_one_name: Some(String::new()),
                    ..GuestPatch::default()
                },
            )
            .unwrap();
        assert_eq!(pending.settle().await, WriteOutcome::Persisted);

        assert_eq!(
            store.updates.lock().clone(),
            vec![doc(json!({
                "_id": "g1",
                "rsvpStatus": "Confirmed",
                "hasPlusOne": false,
                "plusOneName": null
            }))]
        );
        let stored = &store.inner.documents("guestlist")[0];
        assert_eq!(stored.get("plusOneName"), None);
    }

    #[tokio::test]
    async fn toggle_sends_paired_completion_fields() {
        let store = Arc::new(RecordingStore::default());
        let tasks: ListSync<ChecklistItem, _> = ListSync::new(Arc::clone(&store));
        tasks.load().await;

        let created = tasks
            .create(ChecklistDraft {
                task_name: "Book florist".to_string(),
                assigned_to: Some("Sam".to_string()),
                ..ChecklistDraft::default()
            })
            .unwrap();
        let id = created.id().clone();
        created.settle().await;

        let toggled = tasks.toggle_complete(&id).unwrap();
        let item = tasks.get(&id).unwrap();
        assert!(item.is_completed());
        assert_eq!(item.status().label(), "Completed");
        assert_eq!(toggled.settle().await, WriteOutcome::Persisted);

        assert_eq!(
            store.updates.lock().clone(),
            vec![doc(json!({
                "_id": id.as_str(),
                "isCompleted": true,
                "status": "Completed"
            }))]
        );
    }

    #[tokio::test]
    async fn revision_bumps_on_every_change() {
        let store = Arc::new(MemoryStore::new());
        let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
        let mut revisions = guests.subscribe();

        guests.load().await;
        assert!(revisions.has_changed().unwrap());
        let after_load = *revisions.borrow_and_update();

        let pending = guests.create(guest_draft("Alex")).unwrap();
        assert_eq!(*revisions.borrow_and_update(), after_load + 1);
        pending.settle().await;
    }

    #[tokio::test]
    async fn malformed_records_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        store.seed(
            "guestlist",
            vec![
                doc(json!({"_id": "g1", "guestName": "Alex"})),
                doc(json!({"_id": 42, "guestName": "Broken"})),
            ],
        );
        let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
        assert_eq!(guests.load().await, LoadOutcome::Loaded(1));
    }

    #[tokio::test]
    async fn null_and_mistyped_fields_keep_the_record() {
        let store = Arc::new(MemoryStore::new());
        store.seed(
            "guestlist",
            vec![
                doc(json!({"_id": "g1", "guestName": "Alex", "hasPlusOne": null})),
                doc(json!({"_id": "g2", "guestName": 7, "dietaryRestrictions": ["nuts"]})),
            ],
        );
        store.seed(
            "vendordirectory",
            vec![doc(json!({"_id": "v1", "vendorName": "Bloom", "phoneNumber": 5_551_234}))],
        );
        let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
        let vendors: ListSync<Vendor, _> = ListSync::new(Arc::clone(&store));

        assert_eq!(guests.load().await, LoadOutcome::Loaded(2));
        let alex = guests.get(&"g1".parse().unwrap()).unwrap();
        assert!(!alex.has_plus_one);
        let numbered = guests.get(&"g2".parse().unwrap()).unwrap();
        assert_eq!(numbered.guest_name.as_deref(), Some("7"));
        assert_eq!(numbered.dietary_restrictions, None);

        assert_eq!(vendors.load().await, LoadOutcome::Loaded(1));
        let bloom = vendors.get(&"v1".parse().unwrap()).unwrap();
        assert_eq!(bloom.phone_number.as_deref(), Some("5551234"));
    }

    #[tokio::test]
    async fn rejected_update_is_reverted_by_reload() {
        let store = Arc::new(MemoryStore::new());
        store.seed("guestlist", vec![doc(json!({"_id": "g1", "guestName": "Alex"}))]);
        let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
        guests.load().await;
        store.set_failure_mode(FailureMode::RejectWrites);

        let id: RecordId = "g1".parse().unwrap();
        let patch = GuestPatch {
            guest_name: Some("Zed".to_string()),
            ..GuestPatch::default()
        };
        let pending = guests.update(&id, patch).unwrap();
        assert_eq!(names(&guests.items()), vec!["Zed"]);

        assert_eq!(pending.settle().await, WriteOutcome::Reverted);
        assert_eq!(names(&guests.items()), vec!["Alex"]);
        assert_eq!(guests.phase(), SyncPhase::Idle);
    }

    #[tokio::test]
    async fn rejected_toggle_restores_pending() {
        let store = Arc::new(MemoryStore::new());
        store.seed(
            "weddingchecklist",
            vec![doc(json!({"_id": "t1", "taskName": "Book venue", "isCompleted": false}))],
        );
        let tasks: ListSync<ChecklistItem, _> = ListSync::new(Arc::clone(&store));
        tasks.load().await;
        store.set_failure_mode(FailureMode::RejectWrites);

        let id: RecordId = "t1".parse().unwrap();
        let pending = tasks.toggle_complete(&id).unwrap();
        assert!(tasks.get(&id).unwrap().is_completed());

        assert_eq!(pending.settle().await, WriteOutcome::Reverted);
        assert!(!tasks.get(&id).unwrap().is_completed());
    }

    #[tokio::test]
    async fn persisted_write_bumps_revision() {
        let store = Arc::new(MemoryStore::new());
        let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
        guests.load().await;
        let mut revisions = guests.subscribe();
        revisions.borrow_and_update();

        let pending = guests.create(guest_draft("Alex")).unwrap();
        let after_create = *revisions.borrow_and_update();

        assert_eq!(pending.settle().await, WriteOutcome::Persisted);
        assert!(revisions.has_changed().unwrap());
        assert_eq!(*revisions.borrow_and_update(), after_create + 1);
    }
}
