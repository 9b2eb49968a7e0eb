//! Live synchronization between the store and dashboard panels
//!
//! Panels never poll. Each one opens a [`LiveView`] over the query it
//! renders and receives the complete decoded result set on every
//! committed change; [`BadgeBoard`] builds on the same mechanism for the
//! sidebar's notification counts. Views unsubscribe on drop, so stale
//! subscriptions cannot outlive the panel that opened them.

pub mod badges;
pub mod view;

pub use badges::{default_badges, BadgeBoard, BadgeSpec};
pub use view::{LiveView, LiveViewBuilder};
