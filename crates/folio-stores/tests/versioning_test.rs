//! Integration tests for VersioningStore over the collection backends.
//!
//! The memory and SQLite backends run everywhere. MongoDB tests need a
//! running server:
//! ```bash
//! FOLIO_TEST_MONGODB_URI="mongodb://localhost:27017" \
//!     cargo test -p folio-stores --features mongodb -- --ignored
//! ```

use std::sync::Arc;

use folio_core::error::FolioResult;
use folio_core::traits::{DocumentCollection, DocumentService};
use folio_core::types::{ClientDocument, DeleteScope, VersionSelector};
use folio_core::VersioningStore;
use folio_stores::CollectionFactory;

fn doc(doc_id: i64, doc_url: &str) -> ClientDocument {
    ClientDocument::new(doc_id, doc_url).with_element("Heading", "h2")
}

async fn sequential_versions(store: &VersioningStore) -> FolioResult<()> {
    for expected in 1..=3 {
        let version = store.store_document(&doc(10, "u")).await?;
        assert_eq!(version, expected);
    }
    Ok(())
}

async fn latest_and_exact(store: &VersioningStore) -> FolioResult<()> {
    store.store_document(&doc(20, "first")).await?;
    store.store_document(&doc(20, "second")).await?;

    let latest = store
        .retrieve_document(20, VersionSelector::Latest)
        .await?
        .expect("latest version");
    assert_eq!(latest.doc_url, "second");
    assert_eq!(latest.elements[0].kind, "h2");

    let first = store
        .retrieve_document(20, VersionSelector::Exact(1))
        .await?
        .expect("version 1");
    assert_eq!(first.doc_url, "first");

    let never = store
        .retrieve_document(20, VersionSelector::Exact(7))
        .await?;
    assert!(never.is_none());

    let unknown = store
        .retrieve_document(999, VersionSelector::Latest)
        .await?;
    assert!(unknown.is_none());
    Ok(())
}

async fn remove_scopes(store: &VersioningStore) -> FolioResult<()> {
    for url in ["a", "b", "c"] {
        store.store_document(&doc(30, url)).await?;
    }

    store.remove_document(30, DeleteScope::Version(2)).await?;
    assert!(store
        .retrieve_document(30, VersionSelector::Exact(2))
        .await?
        .is_none());
    assert!(store
        .retrieve_document(30, VersionSelector::Exact(1))
        .await?
        .is_some());

    // Removing something that is already gone is not an error.
    store.remove_document(30, DeleteScope::Version(2)).await?;

    store.remove_document(30, DeleteScope::AllVersions).await?;
    assert!(store
        .retrieve_document(30, VersionSelector::Latest)
        .await?
        .is_none());
    Ok(())
}

async fn update_in_place(store: &VersioningStore) -> FolioResult<()> {
    store.store_document(&doc(40, "draft")).await?;
    store.update_document(&doc(40, "final"), 1).await?;

    let updated = store
        .retrieve_document(40, VersionSelector::Exact(1))
        .await?
        .expect("version 1");
    assert_eq!(updated.doc_url, "final");

    // No version 5 exists; the call succeeds and creates nothing.
    store.update_document(&doc(40, "ghost"), 5).await?;
    assert!(store
        .retrieve_document(40, VersionSelector::Exact(5))
        .await?
        .is_none());
    assert_eq!(store.store_document(&doc(40, "next")).await?, 2);
    Ok(())
}

async fn retrieve_by_version(store: &VersioningStore) -> FolioResult<()> {
    store.store_document(&doc(51, "one-v1")).await?;
    store.store_document(&doc(52, "two-v1")).await?;
    store.store_document(&doc(51, "one-v2")).await?;

    let mut at_one: Vec<String> = store
        .retrieve_documents(1)
        .await?
        .into_iter()
        .filter(|d| d.doc_id == 51 || d.doc_id == 52)
        .map(|d| d.doc_url)
        .collect();
    at_one.sort();
    assert_eq!(at_one, vec!["one-v1", "two-v1"]);

    let at_two: Vec<i64> = store
        .retrieve_documents(2)
        .await?
        .into_iter()
        .filter(|d| d.doc_id == 51 || d.doc_id == 52)
        .map(|d| d.doc_id)
        .collect();
    assert_eq!(at_two, vec![51]);

    assert!(store.retrieve_documents(9_999).await?.is_empty());
    Ok(())
}

/// Store a then b, remove version 1, latest is still b.
async fn remove_first_keeps_latest(store: &VersioningStore) -> FolioResult<()> {
    assert_eq!(store.store_document(&doc(60, "a")).await?, 1);
    assert_eq!(store.store_document(&doc(60, "b")).await?, 2);

    store.remove_document(60, DeleteScope::Version(1)).await?;

    let latest = store
        .retrieve_document(60, VersionSelector::Latest)
        .await?
        .expect("version 2 remains");
    assert_eq!(latest.doc_url, "b");

    assert_eq!(store.store_document(&doc(60, "c")).await?, 3);
    Ok(())
}

async fn concurrent_stores(store: Arc<VersioningStore>) -> FolioResult<()> {
    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.store_document(&doc(70, &format!("w{}", i))).await })
        })
        .collect();

    let mut versions = Vec::new();
    for handle in handles {
        versions.push(handle.await.expect("task panicked")?);
    }
    versions.sort_unstable();
    assert_eq!(versions, (1..=16).collect::<Vec<i64>>());
    Ok(())
}

async fn run_all(collection: Arc<dyn DocumentCollection>) -> FolioResult<()> {
    let store = Arc::new(VersioningStore::new(collection));

    sequential_versions(&store).await?;
    latest_and_exact(&store).await?;
    remove_scopes(&store).await?;
    update_in_place(&store).await?;
    retrieve_by_version(&store).await?;
    remove_first_keeps_latest(&store).await?;
    concurrent_stores(store).await?;
    Ok(())
}

#[tokio::test]
async fn test_memory_backend() -> FolioResult<()> {
    run_all(CollectionFactory::memory("one")).await
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_sqlite_memory_backend() -> FolioResult<()> {
    run_all(CollectionFactory::sqlite_memory("one")?).await
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_sqlite_file_persists_across_reopen() -> FolioResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("documents.db");

    {
        let store = VersioningStore::new(CollectionFactory::sqlite(&path, "one")?);
        store.store_document(&doc(1, "a")).await?;
        store.store_document(&doc(1, "b")).await?;
    }

    let store = VersioningStore::new(CollectionFactory::sqlite(&path, "one")?);
    assert_eq!(store.store_document(&doc(1, "c")).await?, 3);

    let latest = store
        .retrieve_document(1, VersionSelector::Latest)
        .await?
        .expect("latest");
    assert_eq!(latest.doc_url, "c");
    Ok(())
}

#[cfg(feature = "sqlite")]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sqlite_concurrent_stores_multi_thread() -> FolioResult<()> {
    let store = Arc::new(VersioningStore::new(CollectionFactory::sqlite_memory("one")?));
    concurrent_stores(store).await
}

#[cfg(feature = "mongodb")]
#[tokio::test]
#[ignore] // Requires MongoDB
async fn test_mongodb_backend() -> FolioResult<()> {
    let url = match std::env::var("FOLIO_TEST_MONGODB_URI") {
        Ok(url) => url,
        Err(_) => return Ok(()), // Skip if no server
    };

    let name = format!(
        "versioning_test_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default()
    );
    let collection = CollectionFactory::mongodb(&url, "folio_test", &name).await?;
    run_all(collection).await
}
