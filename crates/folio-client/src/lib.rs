//! folio-client - HTTP client for the folio document API.
//!
//! # Example
//!
//! ```ignore
//! use folio_client::DocumentClient;
//! use folio_core::{ClientDocument, DocumentService, VersionSelector};
//!
//! let client = DocumentClient::new("http://localhost:8080")?;
//!
//! let version = client.store_document(&ClientDocument::new(1, "https://example.com")).await?;
//! let latest = client.retrieve_document(1, VersionSelector::Latest).await?;
//! ```

mod client;

pub use client::{DocumentClient, DEFAULT_BASE_URL};
pub use folio_core::traits::DocumentService;
pub use folio_core::types::{ClientDocument, DeleteScope, VersionSelector};
