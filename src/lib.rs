//! Leihwerk Makerspace Lending System
//!
//! The data layer behind the FabLab lending dashboard: a document store
//! abstraction with live subscriptions, per-entity repositories, status
//! lifecycle services for requests, orders and problem reports, and the
//! sidebar's notification badge counts.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod live;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use live::BadgeBoard;
use repository::Repository;
use services::Services;
use store::{MemoryStore, SharedStore};

/// Application state shared across all panels
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repository: Repository,
    pub services: Arc<Services>,
}

impl AppState {
    /// Wire up repositories and services over the given store backend
    pub fn new(store: SharedStore, config: AppConfig) -> Self {
        let repository = Repository::new(store);
        let services = Services::new(repository.clone(), config.lending.clone());
        Self {
            config: Arc::new(config),
            repository,
            services: Arc::new(services),
        }
    }

    /// State over a fresh in-process store, as used by tests and demos
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }

    /// Open the default notification badges over this state's store
    pub async fn badges(&self) -> AppResult<BadgeBoard> {
        BadgeBoard::open(self.repository.store.clone()).await
    }
}
