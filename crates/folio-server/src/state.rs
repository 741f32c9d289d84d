//! Server state management.

use std::sync::Arc;

use folio_core::traits::DocumentService;
use folio_core::versioning::VersioningStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    service: Arc<dyn DocumentService>,
    backend: String,
}

impl AppState {
    /// Create state around any document service.
    pub fn new(service: Arc<dyn DocumentService>, backend: impl Into<String>) -> Self {
        Self {
            service,
            backend: backend.into(),
        }
    }

    /// Create state around a versioning store, naming its backend.
    pub fn from_store(store: Arc<VersioningStore>) -> Self {
        let backend = store.collection().provider().to_string();
        Self::new(store, backend)
    }

    /// The document service handlers call into.
    pub fn service(&self) -> &dyn DocumentService {
        self.service.as_ref()
    }

    /// Name of the backing collection provider.
    pub fn backend(&self) -> &str {
        &self.backend
    }
}
