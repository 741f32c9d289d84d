//! Document collection trait and related types.

use std::path::PathBuf;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::FolioResult;
use crate::types::{Filter, FindOptions, StoredDocument};

/// Stream of decoded records returned by [`DocumentCollection::find`].
///
/// Each item decodes independently, so a malformed record shows up as an
/// `Err` item in its place in iteration order.
pub type DocumentCursor = BoxStream<'static, FolioResult<StoredDocument>>;

/// Core DocumentCollection trait - all storage backends implement this.
///
/// A collection holds [`StoredDocument`] records and answers equality
/// queries on `doc.doc_id` and `doc_version`. Each call is atomic on its own;
/// nothing spans calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Insert a new record.
    async fn insert(&self, record: StoredDocument) -> FolioResult<()>;

    /// Replace the first record matching `filter` in full.
    /// Returns the number of records matched (0 or 1).
    async fn replace_one(&self, filter: &Filter, record: StoredDocument) -> FolioResult<u64>;

    /// Delete the first record matching `filter`. Returns the number deleted.
    async fn delete_one(&self, filter: &Filter) -> FolioResult<u64>;

    /// Delete every record matching `filter`. Returns the number deleted.
    async fn delete_many(&self, filter: &Filter) -> FolioResult<u64>;

    /// Find records matching `filter`, optionally sorted and limited.
    async fn find(&self, filter: &Filter, options: FindOptions) -> FolioResult<DocumentCursor>;

    /// Create the unique (`doc.doc_id`, `doc_version`) index if missing.
    async fn ensure_indexes(&self) -> FolioResult<()>;

    /// The backend behind this collection.
    fn provider(&self) -> CollectionProvider;
}

/// Collection provider type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CollectionProvider {
    /// Process-local, non-persistent collection.
    Memory,
    /// SQLite file (or `:memory:`) via rusqlite.
    #[default]
    Sqlite,
    /// MongoDB collection.
    #[strum(to_string = "mongodb", serialize = "mongo")]
    MongoDB,
}

/// Collection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Provider type.
    pub provider: CollectionProvider,
    /// Connection string (MongoDB).
    pub url: String,
    /// Database name (MongoDB).
    pub database: String,
    /// Collection (or table) name.
    pub collection_name: String,
    /// Database file (SQLite).
    pub path: PathBuf,
}

fn default_sqlite_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".folio"))
        .unwrap_or_else(|| PathBuf::from(".folio"))
        .join("documents.db")
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            provider: CollectionProvider::default(),
            url: "mongodb://db:27017".to_string(),
            database: "knowledge".to_string(),
            collection_name: "one".to_string(),
            path: default_sqlite_path(),
        }
    }
}

impl CollectionConfig {
    /// Configuration for a process-local collection.
    pub fn memory(collection_name: impl Into<String>) -> Self {
        Self {
            provider: CollectionProvider::Memory,
            collection_name: collection_name.into(),
            ..Default::default()
        }
    }

    /// Configuration for a SQLite collection at `path`.
    pub fn sqlite(path: impl Into<PathBuf>, collection_name: impl Into<String>) -> Self {
        Self {
            provider: CollectionProvider::Sqlite,
            path: path.into(),
            collection_name: collection_name.into(),
            ..Default::default()
        }
    }

    /// Configuration for a MongoDB collection.
    pub fn mongodb(
        url: impl Into<String>,
        database: impl Into<String>,
        collection_name: impl Into<String>,
    ) -> Self {
        Self {
            provider: CollectionProvider::MongoDB,
            url: url.into(),
            database: database.into(),
            collection_name: collection_name.into(),
            ..Default::default()
        }
    }
}
