//! Factory for creating document collections.

use std::sync::Arc;

use folio_core::error::{FolioError, FolioResult};
use folio_core::traits::{CollectionConfig, CollectionProvider, DocumentCollection};

/// Factory for creating document collections.
pub struct CollectionFactory;

impl CollectionFactory {
    /// Create a collection from the given configuration.
    ///
    /// The returned collection is connected and has its version index in
    /// place.
    pub async fn create(config: &CollectionConfig) -> FolioResult<Arc<dyn DocumentCollection>> {
        tracing::debug!(
            "Creating {} collection '{}'",
            config.provider,
            config.collection_name
        );

        match config.provider {
            CollectionProvider::Memory => Ok(Self::memory(&config.collection_name)),

            #[cfg(feature = "sqlite")]
            CollectionProvider::Sqlite => Self::sqlite(&config.path, &config.collection_name),

            #[cfg(feature = "mongodb")]
            CollectionProvider::MongoDB => {
                let collection = crate::mongodb::MongoCollection::connect(config).await?;
                Ok(Arc::new(collection))
            }

            #[allow(unreachable_patterns)]
            provider => Err(FolioError::UnsupportedProvider {
                provider: provider.to_string(),
            }),
        }
    }

    /// Create an in-memory collection.
    pub fn memory(collection_name: &str) -> Arc<dyn DocumentCollection> {
        Arc::new(crate::memory::MemoryCollection::new(collection_name))
    }

    /// Create a SQLite collection in the database file at `path`.
    #[cfg(feature = "sqlite")]
    pub fn sqlite(
        path: impl AsRef<std::path::Path>,
        collection_name: &str,
    ) -> FolioResult<Arc<dyn DocumentCollection>> {
        let collection = crate::sqlite::SqliteCollection::open(path, collection_name)?;
        Ok(Arc::new(collection))
    }

    /// Create a SQLite collection in a private in-memory database.
    #[cfg(feature = "sqlite")]
    pub fn sqlite_memory(collection_name: &str) -> FolioResult<Arc<dyn DocumentCollection>> {
        let collection = crate::sqlite::SqliteCollection::in_memory(collection_name)?;
        Ok(Arc::new(collection))
    }

    /// Connect to a MongoDB collection.
    #[cfg(feature = "mongodb")]
    pub async fn mongodb(
        url: &str,
        database: &str,
        collection_name: &str,
    ) -> FolioResult<Arc<dyn DocumentCollection>> {
        Self::create(&CollectionConfig::mongodb(url, database, collection_name)).await
    }
}
