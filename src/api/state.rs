//! Application state for the allocation engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::store::PlannerStore;

/// Shared application state.
///
/// Holds the loaded configuration and the planning store.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<PlannerStore>,
}

impl AppState {
    /// Creates application state with a store seeded from the configuration.
    pub fn new(config: ConfigLoader) -> Self {
        let store = PlannerStore::shared(config.seed().clone());
        Self::with_store(config, store)
    }

    /// Creates application state around an existing store.
    pub fn with_store(config: ConfigLoader, store: Arc<PlannerStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a reference to the planning store.
    pub fn store(&self) -> &PlannerStore {
        &self.store
    }
}
