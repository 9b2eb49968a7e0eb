//! Live view over a subscribed store query
//!
//! A [`LiveView`] keeps the decoded result set of one subscription current
//! for the lifetime of a dashboard panel. Every committed change delivers
//! the complete matching set again (never a delta), which gets decoded,
//! sorted and handed to the render callback, then published on a watch
//! channel for pull-based consumers. Dropping the view unsubscribes, so a
//! panel that swaps its query simply opens a new view and lets the old one
//! fall out of scope.

use std::cmp::Ordering;
use std::fmt;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::repository::{decode_snapshot, Doc};
use crate::store::{Filter, ListenerGuard, SharedStore, Snapshot, SnapshotCallback};

type SortFn<T> = Box<dyn Fn(&Doc<T>, &Doc<T>) -> Ordering + Send + Sync>;
type ChangeFn<T> = Box<dyn Fn(&[Doc<T>]) + Send + Sync>;

/// Builder for a [`LiveView`]. Created via [`LiveView::over`] or one of the
/// repository `watch` helpers.
pub struct LiveViewBuilder<T> {
    store: SharedStore,
    collection: String,
    filter: Filter,
    sort: Option<SortFn<T>>,
    on_change: Option<ChangeFn<T>>,
}

impl<T> LiveViewBuilder<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(store: SharedStore, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            filter: Filter::all(),
            sort: None,
            on_change: None,
        }
    }

    /// Restrict the view to documents matching `filter`.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Order every delivered set with `cmp` before it is published.
    pub fn sorted_by(
        mut self,
        cmp: impl Fn(&Doc<T>, &Doc<T>) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.sort = Some(Box::new(cmp));
        self
    }

    /// Render callback invoked with the full set on every change, the
    /// initial set included. Must not touch the store or close views.
    pub fn on_change(mut self, callback: impl Fn(&[Doc<T>]) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Subscribe and return the running view.
    ///
    /// The initial snapshot is decoded and delivered before this returns;
    /// [`LiveView::current`] is immediately usable and
    /// [`LiveView::changed`] only wakes for writes after this point.
    pub async fn open(self) -> AppResult<LiveView<T>> {
        let (tx, mut rx) = watch::channel(Vec::new());
        let collection = self.collection.clone();
        let target = collection.clone();
        let sort = self.sort;
        let on_change = self.on_change;
        let callback: SnapshotCallback = Box::new(move |snapshot: Snapshot| {
            let mut docs: Vec<Doc<T>> = decode_snapshot(&target, snapshot);
            if let Some(cmp) = &sort {
                docs.sort_by(|a, b| cmp(a, b));
            }
            if let Some(render) = &on_change {
                render(&docs);
            }
            // All receivers may be gone while the subscription lives on.
            let _ = tx.send(docs);
        });
        let guard = self
            .store
            .subscribe(&collection, self.filter, callback)
            .await?;
        // Mark the initial snapshot as seen.
        rx.borrow_and_update();
        debug!(collection, "live view opened");
        Ok(LiveView {
            collection,
            rx,
            guard,
        })
    }
}

/// A continuously synchronized, decoded result set.
pub struct LiveView<T> {
    collection: String,
    rx: watch::Receiver<Vec<Doc<T>>>,
    guard: ListenerGuard,
}

impl<T> LiveView<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Start building a view over `collection`.
    pub fn over(store: SharedStore, collection: impl Into<String>) -> LiveViewBuilder<T> {
        LiveViewBuilder::new(store, collection)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The latest delivered set.
    pub fn current(&self) -> Vec<Doc<T>> {
        self.rx.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.rx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.borrow().is_empty()
    }

    /// Wait until a new set has been delivered since the last call.
    pub async fn changed(&mut self) -> AppResult<()> {
        self.rx
            .changed()
            .await
            .map_err(|_| AppError::StoreUnavailable("live view closed".to_string()))
    }

    /// Stream of delivered sets, starting with the current one.
    pub fn updates(&self) -> WatchStream<Vec<Doc<T>>> {
        WatchStream::new(self.rx.clone())
    }

    /// Unsubscribe. Equivalent to dropping the view.
    pub fn close(self) {
        self.guard.close();
    }
}

impl<T> fmt::Debug for LiveView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveView")
            .field("collection", &self.collection)
            .field("len", &self.rx.borrow().len())
            .finish()
    }
}
