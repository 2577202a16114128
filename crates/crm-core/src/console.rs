//! Composition root
//!
//! Builds the core once and wires the pieces by reference: the interceptor
//! and the coordinator share the suppression window and the event bus, the
//! fetcher is built around the interceptor and the session store.

use crate::api::RecordFetcher;
use crate::auth::{AuthInterceptor, SuppressionWindow};
use crate::config::ConsoleConfig;
use crate::event::EventBus;
use crate::history::HistoryDriver;
use crate::navigation::Navigator;
use crate::recovery::RecoveryCoordinator;
use crate::session::{SessionStorage, SessionStore};
use std::sync::Arc;

/// Everything the app shell needs, constructed at the root
#[derive(Clone)]
pub struct Console {
    pub config: ConsoleConfig,
    pub events: EventBus,
    pub session: SessionStore,
    pub interceptor: AuthInterceptor,
    pub navigator: Arc<Navigator>,
    pub recovery: Arc<RecoveryCoordinator>,
}

impl Console {
    /// Wire the core.
    ///
    /// `make_fetcher` receives the interceptor and the session store so that
    /// every request it issues reads the session through the store and every
    /// response passes the interceptor.
    pub fn new<F>(
        config: ConsoleConfig,
        history: Arc<dyn HistoryDriver>,
        storage: Arc<dyn SessionStorage>,
        make_fetcher: F,
    ) -> Self
    where
        F: FnOnce(AuthInterceptor, SessionStore) -> Arc<dyn RecordFetcher>,
    {
        let events = EventBus::new(config.event_capacity);
        let window = Arc::new(SuppressionWindow::new());
        let session = SessionStore::new(storage);
        let interceptor =
            AuthInterceptor::new(config.auth_sentinel.clone(), window.clone(), events.clone());

        let fetcher = make_fetcher(interceptor.clone(), session.clone());
        let navigator = Arc::new(Navigator::new(
            history.clone(),
            fetcher,
            events.clone(),
            config.base_prefix.clone(),
        ));
        let recovery = Arc::new(RecoveryCoordinator::new(
            session.clone(),
            navigator.clone(),
            history,
            window,
        ));

        Self {
            config,
            events,
            session,
            interceptor,
            navigator,
            recovery,
        }
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("config", &self.config)
            .field("navigator", &self.navigator)
            .field("recovery", &self.recovery)
            .finish()
    }
}
