//! Document endpoints.

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use folio_core::types::{ClientDocument, DeleteScope, VersionSelector};

use super::params::{parse_document, QueryParams};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Response for storing a document.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreResponse {
    pub version: i64,
}

/// Get one version of a document (latest when `doc_version` is left out).
/// GET /document?doc_id=..&doc_version=..
pub async fn get_document(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<ClientDocument>> {
    let params = QueryParams::parse(query.as_deref());
    let doc_id = params.required_int("doc_id")?;
    let selector = VersionSelector::from_raw(params.optional_int("doc_version")?);

    state
        .service()
        .retrieve_document(doc_id, selector)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

/// Store a new version of a document.
/// POST /document
pub async fn store_document(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<StoreResponse>> {
    let doc = parse_document(&body)?;
    let version = state.service().store_document(&doc).await?;

    tracing::debug!(doc_id = doc.doc_id, version, "Stored document");
    Ok(Json(StoreResponse { version }))
}

/// Overwrite an existing version in place.
/// PUT /document?doc_version=..
pub async fn update_document(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let params = QueryParams::parse(query.as_deref());
    let doc_version = params.required_int("doc_version")?;
    let doc = parse_document(&body)?;

    state.service().update_document(&doc, doc_version).await?;
    Ok(StatusCode::OK)
}

/// Delete one version, or every version when `doc_version` is left out.
/// DELETE /document?doc_id=..&doc_version=..
pub async fn remove_document(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<StatusCode> {
    let params = QueryParams::parse(query.as_deref());
    let doc_id = params.required_int("doc_id")?;
    let scope = DeleteScope::from_raw(params.optional_int("doc_version")?);

    state.service().remove_document(doc_id, scope).await?;
    Ok(StatusCode::OK)
}

/// Get every document stored at a version.
/// GET /documents?doc_version=..
pub async fn get_documents(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Vec<ClientDocument>>> {
    let params = QueryParams::parse(query.as_deref());
    let doc_version = params.required_int("doc_version")?;

    let docs = state.service().retrieve_documents(doc_version).await?;
    Ok(Json(docs))
}
