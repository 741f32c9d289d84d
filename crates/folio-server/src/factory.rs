//! Factory for building the document service from configuration.

use std::sync::Arc;

use folio_core::config::FolioConfig;
use folio_core::error::FolioResult;
use folio_core::versioning::VersioningStore;
use folio_stores::CollectionFactory;

use crate::state::AppState;

/// Connect the configured collection and wrap it in a versioning store.
pub async fn create_store(config: &FolioConfig) -> FolioResult<Arc<VersioningStore>> {
    let collection = CollectionFactory::create(&config.collection).await?;
    Ok(Arc::new(VersioningStore::new(collection)))
}

/// Build the application state from configuration.
pub async fn create_state(config: &FolioConfig) -> FolioResult<AppState> {
    let store = create_store(config).await?;
    Ok(AppState::from_store(store))
}
