//! Shared application state: the session store, connection registry, and
//! countdown scheduler behind one cheaply-cloneable handle.

pub mod registry;
pub mod scheduler;
pub mod session;
pub mod store;

use std::sync::Arc;

use crate::config::AppConfig;

use self::{registry::ConnectionRegistry, scheduler::TimerScheduler, store::SessionStore};

/// Cheaply-cloneable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state owning every mutable core component.
///
/// The store is the single source of truth for session data; the registry
/// and scheduler carry the per-session connection and driver bookkeeping
/// that hangs off the same ids.
pub struct AppState {
    config: AppConfig,
    store: SessionStore,
    registry: ConnectionRegistry,
    scheduler: TimerScheduler,
}

impl AppState {
    /// Construct the state wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            config,
            store: SessionStore::new(),
            registry: ConnectionRegistry::new(),
            scheduler: TimerScheduler::new(),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The authoritative session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Registry of live connections grouped by session id.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Per-session countdown drivers.
    pub fn scheduler(&self) -> &TimerScheduler {
        &self.scheduler
    }
}
