//! Notification badge counts
//!
//! The sidebar shows a badge per work queue: equipment requests waiting
//! for review, material orders waiting for approval, problem reports
//! nobody has closed out. Each badge is a [`LiveView`] over the raw
//! documents of its queue, so counts update on every committed write
//! without polling. A badge is only shown while its count is non-zero.

use indexmap::IndexMap;

use crate::error::AppResult;
use crate::live::view::{LiveView, LiveViewBuilder};
use crate::models::enums::{OrderStatus, ReportStatus, RequestStatus, RequestType};
use crate::store::{collections, Document, Filter, SharedStore};

/// One badge: a key the UI addresses it by, plus the query it counts.
pub struct BadgeSpec {
    pub key: String,
    pub collection: String,
    pub filter: Filter,
}

impl BadgeSpec {
    pub fn new(key: impl Into<String>, collection: impl Into<String>, filter: Filter) -> Self {
        Self {
            key: key.into(),
            collection: collection.into(),
            filter,
        }
    }
}

/// The badge set the dashboard ships with.
pub fn default_badges() -> Vec<BadgeSpec> {
    vec![
        BadgeSpec::new(
            "requests.pending",
            collections::REQUESTS,
            Filter::new()
                .field_eq("type", RequestType::Equipment.as_str())
                .field_eq("status", RequestStatus::Pending.as_str()),
        ),
        BadgeSpec::new(
            "materialOrders.pending",
            collections::MATERIAL_ORDERS,
            Filter::new().field_eq("status", OrderStatus::Pending.as_str()),
        ),
        BadgeSpec::new(
            "problemReports.open",
            collections::PROBLEM_REPORTS,
            Filter::new().field_in(
                "status",
                [ReportStatus::Open.as_str(), ReportStatus::InProgress.as_str()],
            ),
        ),
    ]
}

/// All badges of one dashboard session, keyed by [`BadgeSpec::key`].
///
/// Counts come straight off the underlying views; the board itself holds
/// no state that could drift. Badges count raw [`Document`]s rather than
/// decoded models so a malformed document still shows up as pending work.
pub struct BadgeBoard {
    badges: IndexMap<String, LiveView<Document>>,
}

impl BadgeBoard {
    /// Open the default badge set over `store`.
    pub async fn open(store: SharedStore) -> AppResult<Self> {
        Self::with_specs(store, default_badges()).await
    }

    pub async fn with_specs(store: SharedStore, specs: Vec<BadgeSpec>) -> AppResult<Self> {
        let mut badges = IndexMap::new();
        for spec in specs {
            let view = LiveViewBuilder::new(store.clone(), spec.collection)
                .filter(spec.filter)
                .open()
                .await?;
            badges.insert(spec.key, view);
        }
        Ok(Self { badges })
    }

    /// Current count for `key`; unknown keys count zero.
    pub fn count(&self, key: &str) -> usize {
        self.badges.get(key).map_or(0, LiveView::len)
    }

    /// Whether the badge for `key` should be rendered at all.
    pub fn is_visible(&self, key: &str) -> bool {
        self.count(key) > 0
    }

    /// Snapshot of every badge count, in registration order.
    pub fn counts(&self) -> IndexMap<String, usize> {
        self.badges
            .iter()
            .map(|(key, view)| (key.clone(), view.len()))
            .collect()
    }

    /// Mutable access to one badge's view, for awaiting changes.
    pub fn view_mut(&mut self, key: &str) -> Option<&mut LiveView<Document>> {
        self.badges.get_mut(key)
    }

    /// Unsubscribe every badge.
    pub fn close(self) {
        for (_, view) in self.badges {
            view.close();
        }
    }
}
