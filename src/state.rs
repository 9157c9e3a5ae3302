use std::sync::Arc;

use crate::identity::IdentityProvider;
use crate::realtime::RealtimeContext;
use crate::store::DataStore;

/// Shared application dependencies, constructed once in `main` and threaded
/// into every handler through axum's `State` extractor. Nothing here is
/// reachable as ambient global state; tests build one of these around fakes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    pub identity: Arc<dyn IdentityProvider>,
    /// Realtime connection handle, absent when the realtime server could not
    /// be reached at startup. Handlers that publish events treat `None` as
    /// "publishing disabled".
    pub realtime: Option<Arc<RealtimeContext>>,
}

impl AppState {
    pub fn new(store: Arc<dyn DataStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            store,
            identity,
            realtime: None,
        }
    }

    pub fn with_realtime(mut self, realtime: Arc<RealtimeContext>) -> Self {
        self.realtime = Some(realtime);
        self
    }
}
