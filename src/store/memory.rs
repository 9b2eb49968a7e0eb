//! In-process document store
//!
//! `MemoryStore` emulates the hosted document database the dashboard runs
//! against: schemaless collections, merge-patch updates and snapshot
//! listeners that receive the complete current matching set after every
//! committed write. It backs local operation and the whole test suite.
//!
//! Commit and listener dispatch happen under one lock, so a listener never
//! observes snapshots out of commit order and an unsubscribed listener is
//! never invoked again once `close()` has returned. The flip side of the
//! synchronous dispatch: callbacks must not call back into the store and
//! must not close listener guards; they hand the snapshot over (to a
//! channel, a cache, a render queue) and return.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::debug;

use super::filter::Filter;
use super::{
    DocId, Document, DocumentStore, ListenerGuard, Snapshot, SnapshotCallback, StoreError,
    StoreResult, StoredDocument,
};

struct ListenerEntry {
    id: u64,
    collection: String,
    filter: Filter,
    callback: SnapshotCallback,
}

#[derive(Default)]
struct State {
    collections: IndexMap<String, IndexMap<DocId, Document>>,
    listeners: Vec<ListenerEntry>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    next_listener_id: AtomicU64,
    offline: AtomicBool,
}

/// In-memory [`DocumentStore`] with live snapshot listeners.
#[derive(Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Simulate a lost backend connection: while offline, every operation
    /// fails with [`StoreError::Unavailable`]. Registered listeners are
    /// kept and resume firing once writes succeed again.
    pub fn set_offline(&self, offline: bool) {
        self.shared.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.shared.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("backend offline".to_string()));
        }
        Ok(())
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        // A panicking listener must not wedge the store for good.
        self.shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn matching(state: &State, collection: &str, filter: &Filter) -> Snapshot {
        state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| filter.matches(fields))
                    .map(|(id, fields)| StoredDocument {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Invoke every listener on `collection` with its current matching set.
    /// Runs under the state lock: see the module docs for what listener
    /// callbacks are allowed to do.
    fn dispatch(state: &State, collection: &str) {
        for listener in &state.listeners {
            if listener.collection == collection {
                let snapshot = Self::matching(state, collection, &listener.filter);
                (listener.callback)(snapshot);
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, fields: Document) -> StoreResult<DocId> {
        self.ensure_online()?;
        let id = DocId::generate();
        let mut state = self.lock_state();
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Self::dispatch(&state, collection);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &DocId) -> StoreResult<Option<StoredDocument>> {
        self.ensure_online()?;
        let state = self.lock_state();
        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| StoredDocument {
                id: id.clone(),
                fields: fields.clone(),
            }))
    }

    async fn list(&self, collection: &str, filter: Filter) -> StoreResult<Snapshot> {
        self.ensure_online()?;
        let state = self.lock_state();
        Ok(Self::matching(&state, collection, &filter))
    }

    async fn update(&self, collection: &str, id: &DocId, patch: Document) -> StoreResult<()> {
        self.ensure_online()?;
        let mut state = self.lock_state();
        let fields = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            })?;
        for (key, value) in patch {
            if value.is_null() {
                fields.remove(&key);
            } else {
                fields.insert(key, value);
            }
        }
        Self::dispatch(&state, collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocId) -> StoreResult<()> {
        self.ensure_online()?;
        let mut state = self.lock_state();
        let removed = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.shift_remove(id))
            .is_some();
        if removed {
            Self::dispatch(&state, collection);
        }
        Ok(())
    }

    async fn subscribe(
        &self,
        collection: &str,
        filter: Filter,
        callback: SnapshotCallback,
    ) -> StoreResult<ListenerGuard> {
        self.ensure_online()?;
        let id = self.shared.next_listener_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut state = self.lock_state();
            let initial = Self::matching(&state, collection, &filter);
            callback(initial);
            state.listeners.push(ListenerEntry {
                id,
                collection: collection.to_string(),
                filter,
                callback,
            });
        }
        debug!(collection, listener = id, "listener registered");

        let shared = Arc::downgrade(&self.shared);
        let name = collection.to_string();
        Ok(ListenerGuard::new(move || {
            if let Some(shared) = shared.upgrade() {
                let mut state = shared
                    .state
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                state.listeners.retain(|l| l.id != id);
                debug!(collection = %name, listener = id, "listener removed");
            }
        }))
    }
}
