//! Query string and body parsing shared by the document endpoints.

use std::collections::HashMap;

use axum::body::Bytes;
use folio_core::types::{ClientDocument, UNSPECIFIED_VERSION};

use crate::error::{ApiError, ApiResult};

/// Decoded query string. When a name repeats, the first value wins.
#[derive(Debug, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    /// Parse a raw (still percent-encoded) query string.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut params = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }
        Self(params)
    }

    /// A parameter's value; an empty value counts as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// An integer parameter that must be present.
    pub fn required_int(&self, name: &str) -> ApiResult<i64> {
        let value = self.get(name).ok_or_else(|| ApiError::missing_param(name))?;
        value.parse().map_err(|_| {
            ApiError::bad_request(format!("{} parameter must be of type int", name))
        })
    }

    /// An integer parameter that may be left out, defaulting to 0.
    pub fn optional_int(&self, name: &str) -> ApiResult<i64> {
        match self.get(name) {
            None => Ok(UNSPECIFIED_VERSION),
            Some(value) => value.parse().map_err(|_| {
                ApiError::bad_request(format!(
                    "{} parameter must be of type int or left out",
                    name
                ))
            }),
        }
    }
}

/// Decode a request body as a [`ClientDocument`].
pub fn parse_document(body: &Bytes) -> ApiResult<ClientDocument> {
    serde_json::from_slice(body).map_err(|_| ApiError::invalid_json())
}
