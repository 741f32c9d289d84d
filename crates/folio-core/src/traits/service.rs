//! Document service trait.

use async_trait::async_trait;

use crate::error::FolioResult;
use crate::types::{ClientDocument, DeleteScope, VersionSelector};

/// The five document operations exposed to transports.
///
/// Implemented by [`crate::versioning::VersioningStore`] over a local
/// collection, and by remote clients over HTTP.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Fetch one version of a document. `Ok(None)` means no such version.
    async fn retrieve_document(
        &self,
        doc_id: i64,
        selector: VersionSelector,
    ) -> FolioResult<Option<ClientDocument>>;

    /// Store a new version of a document and return its version number.
    async fn store_document(&self, doc: &ClientDocument) -> FolioResult<i64>;

    /// Overwrite an existing version in place. Replacing nothing is not an
    /// error.
    async fn update_document(&self, doc: &ClientDocument, doc_version: i64) -> FolioResult<()>;

    /// Delete one version or every version of a document. Deleting nothing
    /// is not an error.
    async fn remove_document(&self, doc_id: i64, scope: DeleteScope) -> FolioResult<()>;

    /// Fetch every document stored at `doc_version`, across all identifiers.
    async fn retrieve_documents(&self, doc_version: i64) -> FolioResult<Vec<ClientDocument>>;
}
