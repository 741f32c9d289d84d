//! MongoDB document collection implementation.
//!
//! Records are stored as `{ "doc_version": n, "doc": { "doc_id": .. } }`
//! and queried on `doc.doc_id` / `doc_version`.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};

use folio_core::error::{ErrorCode, FolioError, FolioResult};
use folio_core::traits::{CollectionConfig, CollectionProvider, DocumentCollection, DocumentCursor};
use folio_core::types::{
    Filter, FilterTranslator, FindOptions, SortDirection, StoredDocument,
};

use mongodb::{
    bson::{doc, Bson, Document},
    options::{ClientOptions, IndexOptions},
    Client, Collection, IndexModel,
};

/// Name of the unique (`doc.doc_id`, `doc_version`) index.
pub const VERSION_INDEX_NAME: &str = "doc_id_doc_version_unique";

/// Translates [`Filter`]s into BSON query documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoFilterTranslator;

impl FilterTranslator for MongoFilterTranslator {
    type Output = Document;
    type Error = FolioError;

    fn translate(&self, filter: &Filter) -> Result<Document, FolioError> {
        Ok(filter
            .conditions
            .iter()
            .map(|cond| (cond.field.path().to_string(), Bson::Int64(cond.value)))
            .collect())
    }
}

/// MongoDB-backed document collection.
pub struct MongoCollection {
    client: Client,
    collection: Collection<StoredDocument>,
}

impl MongoCollection {
    /// Connect to MongoDB, verify the server answers, and make sure the
    /// version index exists.
    pub async fn connect(config: &CollectionConfig) -> FolioResult<Self> {
        let mut client_options = ClientOptions::parse(&config.url).await.map_err(|e| {
            FolioError::Configuration(format!("Failed to parse MongoDB URL: {}", e))
        })?;
        client_options.app_name = Some("folio".to_string());

        let client = Client::with_options(client_options).map_err(|e| FolioError::Collection {
            message: format!("Failed to create MongoDB client: {}", e),
            code: ErrorCode::ColConnectionFailed,
            source: Some(Box::new(e)),
        })?;

        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| FolioError::Collection {
                message: format!("MongoDB ping failed: {}", e),
                code: ErrorCode::ColConnectionFailed,
                source: Some(Box::new(e)),
            })?;

        tracing::info!(
            "Connected to MongoDB database '{}', collection '{}'",
            config.database,
            config.collection_name
        );

        let store = Self {
            collection: database.collection(&config.collection_name),
            client,
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    /// The underlying driver client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn filter_doc(filter: &Filter) -> FolioResult<Document> {
        MongoFilterTranslator.translate(filter)
    }

    fn find_options(options: &FindOptions) -> mongodb::options::FindOptions {
        let sort = options.sort.map(|sort| {
            let direction = match sort.direction {
                SortDirection::Ascending => 1,
                SortDirection::Descending => -1,
            };
            let field = sort.field.path();
            doc! { field: direction }
        });

        mongodb::options::FindOptions::builder()
            .sort(sort)
            .limit(options.limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX)))
            .build()
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn insert(&self, record: StoredDocument) -> FolioResult<()> {
        self.collection.insert_one(&record, None).await?;
        Ok(())
    }

    async fn replace_one(&self, filter: &Filter, record: StoredDocument) -> FolioResult<u64> {
        let result = self
            .collection
            .replace_one(Self::filter_doc(filter)?, &record, None)
            .await?;
        Ok(result.matched_count)
    }

    async fn delete_one(&self, filter: &Filter) -> FolioResult<u64> {
        let result = self
            .collection
            .delete_one(Self::filter_doc(filter)?, None)
            .await?;
        Ok(result.deleted_count)
    }

    async fn delete_many(&self, filter: &Filter) -> FolioResult<u64> {
        let result = self
            .collection
            .delete_many(Self::filter_doc(filter)?, None)
            .await?;
        Ok(result.deleted_count)
    }

    async fn find(&self, filter: &Filter, options: FindOptions) -> FolioResult<DocumentCursor> {
        let cursor = self
            .collection
            .find(Self::filter_doc(filter)?, Self::find_options(&options))
            .await?;

        Ok(cursor.map_err(FolioError::from).boxed())
    }

    async fn ensure_indexes(&self) -> FolioResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "doc.doc_id": 1, "doc_version": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(VERSION_INDEX_NAME.to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index, None).await?;
        tracing::debug!(
            "Ensured index '{}' on '{}'",
            VERSION_INDEX_NAME,
            self.collection.name()
        );
        Ok(())
    }

    fn provider(&self) -> CollectionProvider {
        CollectionProvider::MongoDB
    }
}
