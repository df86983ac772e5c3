use std::sync::Arc;

use calgrid_core::EventStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        AppState { store }
    }

    pub fn store(&self) -> &dyn EventStore {
        self.store.as_ref()
    }
}
