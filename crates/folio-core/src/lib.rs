//! folio-core - Core library for folio.
//!
//! This crate provides the document types, the collection and service
//! traits, and the versioning store that assigns version numbers on top of
//! any [`DocumentCollection`].
//!
//! # Example
//!
//! ```ignore
//! use folio_core::{ClientDocument, DocumentService, VersionSelector, VersioningStore};
//!
//! let store = VersioningStore::new(collection);
//!
//! let doc = ClientDocument::new(1, "https://example.com/a");
//! let version = store.store_document(&doc).await?;
//!
//! let latest = store.retrieve_document(1, VersionSelector::Latest).await?;
//! ```

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod versioning;

// Re-export commonly used types
pub use config::{FolioConfig, LogFormat, ServerConfig};
pub use error::{ErrorCode, FolioError, FolioResult};
pub use traits::{
    CollectionConfig, CollectionProvider, DocumentCollection, DocumentCursor, DocumentService,
};
pub use types::{
    ClientDocument, DeleteScope, DocumentField, Element, Filter, FilterCondition,
    FilterTranslator, FindOptions, SortDirection, SortSpec, StoredDocument, VersionSelector,
    UNSPECIFIED_VERSION,
};
pub use versioning::VersioningStore;
