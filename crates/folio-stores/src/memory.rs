//! In-memory document collection.
//!
//! Records live in a vector in insertion order, which is also the order
//! unsorted queries return them in. Nothing survives the process.

use std::sync::RwLock;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use folio_core::error::{FolioError, FolioResult};
use folio_core::traits::{CollectionProvider, DocumentCollection, DocumentCursor};
use folio_core::types::{Filter, FindOptions, SortDirection, StoredDocument};

/// Process-local collection, mainly for tests and development.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    name: String,
    records: RwLock<Vec<StoredDocument>>,
}

impl MemoryCollection {
    /// Create an empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: RwLock::new(Vec::new()),
        }
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_error<E: std::fmt::Display>(e: E) -> FolioError {
        FolioError::collection(format!("Failed to acquire lock: {}", e))
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn insert(&self, record: StoredDocument) -> FolioResult<()> {
        let mut records = self.records.write().map_err(Self::lock_error)?;

        let exists = records
            .iter()
            .any(|r| r.doc_id() == record.doc_id() && r.doc_version == record.doc_version);
        if exists {
            return Err(FolioError::duplicate_version(
                record.doc_id(),
                record.doc_version,
            ));
        }

        records.push(record);
        Ok(())
    }

    async fn replace_one(&self, filter: &Filter, record: StoredDocument) -> FolioResult<u64> {
        let mut records = self.records.write().map_err(Self::lock_error)?;

        let Some(index) = records.iter().position(|r| filter.matches(r)) else {
            return Ok(0);
        };

        let collides = records.iter().enumerate().any(|(i, r)| {
            i != index && r.doc_id() == record.doc_id() && r.doc_version == record.doc_version
        });
        if collides {
            return Err(FolioError::duplicate_version(
                record.doc_id(),
                record.doc_version,
            ));
        }

        records[index] = record;
        Ok(1)
    }

    async fn delete_one(&self, filter: &Filter) -> FolioResult<u64> {
        let mut records = self.records.write().map_err(Self::lock_error)?;

        match records.iter().position(|r| filter.matches(r)) {
            Some(index) => {
                records.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(&self, filter: &Filter) -> FolioResult<u64> {
        let mut records = self.records.write().map_err(Self::lock_error)?;

        let before = records.len();
        records.retain(|r| !filter.matches(r));
        Ok((before - records.len()) as u64)
    }

    async fn find(&self, filter: &Filter, options: FindOptions) -> FolioResult<DocumentCursor> {
        let records = self.records.read().map_err(Self::lock_error)?;

        let mut matched: Vec<StoredDocument> =
            records.iter().filter(|r| filter.matches(r)).cloned().collect();

        if let Some(sort) = options.sort {
            matched.sort_by(|a, b| {
                let ord = sort.field.value_of(a).cmp(&sort.field.value_of(b));
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        if let Some(limit) = options.limit {
            matched.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        Ok(stream::iter(matched.into_iter().map(Ok)).boxed())
    }

    async fn ensure_indexes(&self) -> FolioResult<()> {
        // Uniqueness is checked on every write.
        Ok(())
    }

    fn provider(&self) -> CollectionProvider {
        CollectionProvider::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::types::{ClientDocument, DocumentField};
    use futures::TryStreamExt;

    fn record(doc_id: i64, doc_version: i64) -> StoredDocument {
        StoredDocument::new(
            ClientDocument::new(doc_id, format!("https://example.com/{}", doc_id)),
            doc_version,
        )
    }

    async fn collect(
        collection: &MemoryCollection,
        filter: Filter,
        options: FindOptions,
    ) -> Vec<StoredDocument> {
        collection
            .find(&filter, options)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_version() {
        let collection = MemoryCollection::new("test");
        collection.insert(record(1, 1)).await.unwrap();

        let err = collection.insert(record(1, 1)).await.unwrap_err();
        assert_eq!(err.code(), folio_core::ErrorCode::DocDuplicateVersion);

        collection.insert(record(2, 1)).await.unwrap();
        assert_eq!(collection.len(), 2);
    }

    #[tokio::test]
    async fn test_find_sorted_and_limited() {
        let collection = MemoryCollection::new("test");
        for v in [2, 3, 1] {
            collection.insert(record(1, v)).await.unwrap();
        }

        let latest = collect(&collection, Filter::by_doc_id(1), FindOptions::latest_version()).await;
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].doc_version, 3);

        let ascending = collect(
            &collection,
            Filter::by_doc_id(1),
            FindOptions::new().sort(DocumentField::DocVersion, SortDirection::Ascending),
        )
        .await;
        let versions: Vec<i64> = ascending.iter().map(|r| r.doc_version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_find_unsorted_keeps_insertion_order() {
        let collection = MemoryCollection::new("test");
        collection.insert(record(5, 1)).await.unwrap();
        collection.insert(record(2, 1)).await.unwrap();
        collection.insert(record(9, 1)).await.unwrap();

        let found = collect(&collection, Filter::by_version(1), FindOptions::new()).await;
        let ids: Vec<i64> = found.iter().map(|r| r.doc_id()).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[tokio::test]
    async fn test_replace_one() {
        let collection = MemoryCollection::new("test");
        collection.insert(record(1, 1)).await.unwrap();

        let mut replacement = record(1, 1);
        replacement.doc.doc_url = "changed".to_string();

        let matched = collection
            .replace_one(&Filter::by_doc_and_version(1, 1), replacement)
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let missing = collection
            .replace_one(&Filter::by_doc_and_version(1, 2), record(1, 2))
            .await
            .unwrap();
        assert_eq!(missing, 0);
        assert_eq!(collection.len(), 1);

        let found = collect(&collection, Filter::by_doc_id(1), FindOptions::new()).await;
        assert_eq!(found[0].doc.doc_url, "changed");
    }

    #[tokio::test]
    async fn test_delete_one_and_many() {
        let collection = MemoryCollection::new("test");
        for v in 1..=3 {
            collection.insert(record(1, v)).await.unwrap();
        }
        collection.insert(record(2, 1)).await.unwrap();

        assert_eq!(collection.delete_one(&Filter::by_doc_id(1)).await.unwrap(), 1);
        assert_eq!(collection.delete_many(&Filter::by_doc_id(1)).await.unwrap(), 2);
        assert_eq!(collection.delete_many(&Filter::by_doc_id(1)).await.unwrap(), 0);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.provider(), CollectionProvider::Memory);
    }
}
