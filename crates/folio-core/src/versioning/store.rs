//! Versioning store over a document collection.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};

use crate::error::FolioResult;
use crate::traits::{DocumentCollection, DocumentService};
use crate::types::{
    ClientDocument, DeleteScope, Filter, FindOptions, StoredDocument, VersionSelector,
};
use crate::versioning::DocLocks;

/// Assigns version numbers and answers version-aware queries against a
/// [`DocumentCollection`].
///
/// Version assignment for a `doc_id` is serialized inside this store, and
/// the collection's unique (`doc.doc_id`, `doc_version`) index rejects a
/// duplicate written from anywhere else.
pub struct VersioningStore {
    collection: Arc<dyn DocumentCollection>,
    locks: DocLocks,
}

impl VersioningStore {
    /// Create a store over an already-connected collection.
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self {
            collection,
            locks: DocLocks::new(),
        }
    }

    /// The backing collection.
    pub fn collection(&self) -> &Arc<dyn DocumentCollection> {
        &self.collection
    }

    /// Look up a full stored record.
    pub async fn find_one(
        &self,
        doc_id: i64,
        selector: VersionSelector,
    ) -> FolioResult<Option<StoredDocument>> {
        let (filter, options) = match selector {
            VersionSelector::Latest => (Filter::by_doc_id(doc_id), FindOptions::latest_version()),
            VersionSelector::Exact(v) => (Filter::by_doc_and_version(doc_id, v), FindOptions::new()),
        };

        let mut cursor = self.collection.find(&filter, options).await?;
        cursor.next().await.transpose()
    }

    /// The highest stored version for `doc_id`, if any.
    pub async fn latest_version(&self, doc_id: i64) -> FolioResult<Option<i64>> {
        Ok(self
            .find_one(doc_id, VersionSelector::Latest)
            .await?
            .map(|record| record.doc_version))
    }
}

#[async_trait]
impl DocumentService for VersioningStore {
    async fn retrieve_document(
        &self,
        doc_id: i64,
        selector: VersionSelector,
    ) -> FolioResult<Option<ClientDocument>> {
        Ok(self
            .find_one(doc_id, selector)
            .await?
            .map(StoredDocument::into_client_document))
    }

    async fn store_document(&self, doc: &ClientDocument) -> FolioResult<i64> {
        let _guard = self.locks.acquire(doc.doc_id).await;

        let version = match self.latest_version(doc.doc_id).await? {
            Some(latest) => latest + 1,
            None => 1,
        };

        self.collection
            .insert(StoredDocument::new(doc.clone(), version))
            .await?;
        Ok(version)
    }

    async fn update_document(&self, doc: &ClientDocument, doc_version: i64) -> FolioResult<()> {
        // Matching nothing is reported the same as replacing one record.
        let filter = Filter::by_doc_and_version(doc.doc_id, doc_version);
        self.collection
            .replace_one(&filter, StoredDocument::new(doc.clone(), doc_version))
            .await?;
        Ok(())
    }

    async fn remove_document(&self, doc_id: i64, scope: DeleteScope) -> FolioResult<()> {
        match scope {
            DeleteScope::AllVersions => {
                self.collection.delete_many(&Filter::by_doc_id(doc_id)).await?;
            }
            DeleteScope::Version(v) => {
                self.collection
                    .delete_one(&Filter::by_doc_and_version(doc_id, v))
                    .await?;
            }
        }
        Ok(())
    }

    async fn retrieve_documents(&self, doc_version: i64) -> FolioResult<Vec<ClientDocument>> {
        // A record that fails to decode fails the whole call.
        self.collection
            .find(&Filter::by_version(doc_version), FindOptions::new())
            .await?
            .map_ok(StoredDocument::into_client_document)
            .try_collect()
            .await
    }
}
