use std::sync::Arc;

use service::Storage;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }
}
