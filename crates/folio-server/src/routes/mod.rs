//! Route definitions for the HTTP API.

mod documents;
mod health;
mod params;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Single document operations
        .route(
            "/document",
            get(documents::get_document)
                .post(documents::store_document)
                .put(documents::update_document)
                .delete(documents::remove_document),
        )
        // Bulk retrieval by version
        .route("/documents", get(documents::get_documents))
        // Attach state
        .with_state(state)
}

pub use documents::*;
pub use health::*;
pub use params::{parse_document, QueryParams};
