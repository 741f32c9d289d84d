//! folio-stores - Document collection backends for folio.
//!
//! # Supported Backends
//!
//! - **Memory** (always available) - process-local, for tests and development
//! - **SQLite** (feature: `sqlite`, default) - embedded file database via rusqlite
//! - **MongoDB** (feature: `mongodb`) - the MongoDB Rust driver
//!
//! Every backend enforces a unique (`doc.doc_id`, `doc_version`) index.

mod factory;
mod memory;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "mongodb")]
mod mongodb;

// Public exports
pub use factory::CollectionFactory;
pub use memory::MemoryCollection;

#[cfg(feature = "sqlite")]
pub use sqlite::{SqlWhere, SqliteCollection, SqliteFilterTranslator};

#[cfg(feature = "mongodb")]
pub use mongodb::{MongoCollection, MongoFilterTranslator, VERSION_INDEX_NAME};

// Re-export core types for convenience
pub use folio_core::traits::{
    CollectionConfig, CollectionProvider, DocumentCollection, DocumentCursor,
};
