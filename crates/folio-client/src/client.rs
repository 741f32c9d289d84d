//! Document client implementation for the folio HTTP API.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use folio_core::error::{FolioError, FolioResult};
use folio_core::traits::DocumentService;
use folio_core::types::{ClientDocument, DeleteScope, VersionSelector, UNSPECIFIED_VERSION};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Client for a running folio server.
///
/// Implements [`DocumentService`], so it can stand in anywhere a local
/// [`VersioningStore`](folio_core::VersioningStore) is used.
#[derive(Debug, Clone)]
pub struct DocumentClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreResponse {
    version: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl DocumentClient {
    /// Create a new document client.
    pub fn new(base_url: &str) -> FolioResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client around a preconfigured reqwest client.
    pub fn with_client(client: Client, base_url: &str) -> FolioResult<Self> {
        // A trailing slash makes `join` append instead of replacing the
        // last path segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        let base_url = Url::parse(&normalized).map_err(|e| {
            FolioError::Configuration(format!("Invalid base URL '{}': {}", base_url, e))
        })?;

        Ok(Self { client, base_url })
    }

    /// Create a client from `FOLIO_BASE_URL`, defaulting to
    /// [`DEFAULT_BASE_URL`].
    pub fn from_env() -> FolioResult<Self> {
        let base_url =
            std::env::var("FOLIO_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    /// The server this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, params: &[(&str, i64)]) -> FolioResult<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| FolioError::Internal(format!("Failed to build URL: {}", e)))?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, &value.to_string());
            }
        }
        Ok(url)
    }

    /// Turn a non-success response into an error, using the server's
    /// `{"error": ..}` message when there is one.
    async fn check(response: Response, action: &str) -> FolioResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);

        tracing::debug!(status = %status.as_u16(), "Failed to {}: {}", action, message);
        Err(FolioError::from_http_status(status.as_u16(), &message))
    }

    fn send_error(action: &str, e: reqwest::Error) -> FolioError {
        FolioError::api(format!("Failed to {}: {}", action, e))
    }
}

#[async_trait]
impl DocumentService for DocumentClient {
    async fn retrieve_document(
        &self,
        doc_id: i64,
        selector: VersionSelector,
    ) -> FolioResult<Option<ClientDocument>> {
        let mut params = vec![("doc_id", doc_id)];
        match selector {
            // The server reads doc_version=0 as "latest"; no record has it.
            VersionSelector::Exact(UNSPECIFIED_VERSION) => return Ok(None),
            VersionSelector::Exact(v) => params.push(("doc_version", v)),
            VersionSelector::Latest => {}
        }

        let response = self
            .client
            .get(self.endpoint("document", &params)?)
            .send()
            .await
            .map_err(|e| Self::send_error("get document", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let doc = Self::check(response, "get document")
            .await?
            .json()
            .await
            .map_err(|e| FolioError::parse(format!("Failed to parse response: {}", e)))?;
        Ok(Some(doc))
    }

    async fn store_document(&self, doc: &ClientDocument) -> FolioResult<i64> {
        let response = self
            .client
            .post(self.endpoint("document", &[])?)
            .json(doc)
            .send()
            .await
            .map_err(|e| Self::send_error("store document", e))?;

        let result: StoreResponse = Self::check(response, "store document")
            .await?
            .json()
            .await
            .map_err(|e| FolioError::parse(format!("Failed to parse response: {}", e)))?;
        Ok(result.version)
    }

    async fn update_document(&self, doc: &ClientDocument, doc_version: i64) -> FolioResult<()> {
        let response = self
            .client
            .put(self.endpoint("document", &[("doc_version", doc_version)])?)
            .json(doc)
            .send()
            .await
            .map_err(|e| Self::send_error("update document", e))?;

        Self::check(response, "update document").await?;
        Ok(())
    }

    async fn remove_document(&self, doc_id: i64, scope: DeleteScope) -> FolioResult<()> {
        let mut params = vec![("doc_id", doc_id)];
        match scope {
            // The server reads doc_version=0 as "all versions".
            DeleteScope::Version(UNSPECIFIED_VERSION) => return Ok(()),
            DeleteScope::Version(v) => params.push(("doc_version", v)),
            DeleteScope::AllVersions => {}
        }

        let response = self
            .client
            .delete(self.endpoint("document", &params)?)
            .send()
            .await
            .map_err(|e| Self::send_error("remove document", e))?;

        Self::check(response, "remove document").await?;
        Ok(())
    }

    async fn retrieve_documents(&self, doc_version: i64) -> FolioResult<Vec<ClientDocument>> {
        let response = self
            .client
            .get(self.endpoint("documents", &[("doc_version", doc_version)])?)
            .send()
            .await
            .map_err(|e| Self::send_error("get documents", e))?;

        Self::check(response, "get documents")
            .await?
            .json()
            .await
            .map_err(|e| FolioError::parse(format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = DocumentClient::new("http://docs.internal:8080/api").unwrap();
        let url = client
            .endpoint("document", &[("doc_id", 3), ("doc_version", 2)])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://docs.internal:8080/api/document?doc_id=3&doc_version=2"
        );
    }

    #[test]
    fn test_endpoint_without_params() {
        let client = DocumentClient::new("http://localhost:8080/").unwrap();
        let url = client.endpoint("documents", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/documents");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = DocumentClient::new("not a url").unwrap_err();
        assert!(matches!(err, FolioError::Configuration(_)));
    }
}
