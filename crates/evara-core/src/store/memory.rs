//! In-process record store.
//!
//! Used for tests and for demos that need no persistence. A failure switch
//! lets callers simulate an unreachable backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::document::{document_id, merge_document, Document};
use super::RecordStore;
use crate::error::{Error, Result};

/// Which calls a [`MemoryStore`] should reject
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Every call succeeds
    #[default]
    Healthy,
    /// Reads succeed; create, update and delete fail
    RejectWrites,
    /// Every call fails
    Unreachable,
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: HashMap<String, Vec<Document>>,
    failure: FailureMode,
    calls: usize,
}

/// Record store kept entirely in memory. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of a collection, bypassing the failure switch.
    pub fn seed(&self, collection: &str, documents: Vec<Document>) {
        self.state
            .lock()
            .collections
            .insert(collection.to_string(), documents);
    }

    /// Snapshot of a collection in store order
    #[must_use]
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.state
            .lock()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_failure_mode(&self, failure: FailureMode) {
        self.state.lock().failure = failure;
    }

    /// Number of store calls made so far, failed ones included
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.lock().calls
    }

    fn begin_call(&self, write: bool) -> Result<parking_lot::MutexGuard<'_, MemoryState>> {
        let mut state = self.state.lock();
        state.calls += 1;
        let failure = state.failure;
        match failure {
            FailureMode::Unreachable => Err(Error::Unavailable("memory store is offline".into())),
            FailureMode::RejectWrites if write => {
                Err(Error::Unavailable("memory store rejects writes".into()))
            }
            _ => Ok(state),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>> {
        let state = self.begin_call(false)?;
        Ok(state.collections.get(collection).cloned().unwrap_or_default())
    }

    async fn create(&self, collection: &str, document: Document) -> Result<Document> {
        let id = document_id(&document)?.to_string();
        let mut state = self.begin_call(true)?;
        let records = state.collections.entry(collection.to_string()).or_default();
        if records
            .iter()
            .any(|existing| document_id(existing).is_ok_and(|existing| existing == id))
        {
            return Err(Error::InvalidInput(format!(
                "duplicate id in {collection}: {id}"
            )));
        }
        records.push(document.clone());
        Ok(document)
    }

    async fn update(&self, collection: &str, partial: Document) -> Result<Document> {
        let id = document_id(&partial)?.to_string();
        let mut state = self.begin_call(true)?;
        let target = state
            .collections
            .get_mut(collection)
            .and_then(|records| {
                records
                    .iter_mut()
                    .find(|existing| document_id(existing).is_ok_and(|existing| existing == id))
            })
            .ok_or_else(|| Error::not_found(collection, &id))?;
        merge_document(target, partial);
        Ok(target.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut state = self.begin_call(true)?;
        let records = state
            .collections
            .get_mut(collection)
            .ok_or_else(|| Error::not_found(collection, id))?;
        let before = records.len();
        records.retain(|existing| document_id(existing).map_or(true, |existing| existing != id));
        if records.len() == before {
            return Err(Error::not_found(collection, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_create_list_update_delete() {
        let store = MemoryStore::new();
        store
            .create("guestlist", doc(json!({"_id": "a", "guestName": "Alex"})))
            .await
            .unwrap();
        store
            .create("guestlist", doc(json!({"_id": "b", "guestName": "Blair"})))
            .await
            .unwrap();

        let updated = store
            .update("guestlist", doc(json!({"_id": "a", "rsvpStatus": "Confirmed"})))
            .await
            .unwrap();
        assert_eq!(
            updated,
            doc(json!({"_id": "a", "guestName": "Alex", "rsvpStatus": "Confirmed"}))
        );

        store.delete("guestlist", "b").await.unwrap();
        let remaining = store.list_all("guestlist").await.unwrap();
        assert_eq!(remaining, vec![updated]);
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let store = MemoryStore::new();
        let err = store.delete("guestlist", "ghost").await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        let err = store
            .update("guestlist", doc(json!({"_id": "ghost"})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_rejected() {
        let store = MemoryStore::new();
        store
            .create("vendordirectory", doc(json!({"_id": "v"})))
            .await
            .unwrap();
        assert!(store
            .create("vendordirectory", doc(json!({"_id": "v"})))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_failure_modes() {
        let store = MemoryStore::new();
        store.seed("weddingevents", vec![doc(json!({"_id": "e"}))]);

        store.set_failure_mode(FailureMode::RejectWrites);
        assert_eq!(store.list_all("weddingevents").await.unwrap().len(), 1);
        assert!(store.delete("weddingevents", "e").await.is_err());

        store.set_failure_mode(FailureMode::Unreachable);
        assert!(store.list_all("weddingevents").await.is_err());

        store.set_failure_mode(FailureMode::Healthy);
        store.delete("weddingevents", "e").await.unwrap();
        assert_eq!(store.call_count(), 4);
    }
}
