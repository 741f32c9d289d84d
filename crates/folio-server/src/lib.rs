//! folio-server - HTTP API server for folio.
//!
//! This crate exposes a [`DocumentService`](folio_core::DocumentService)
//! over HTTP/JSON.
//!
//! # Example
//!
//! ```ignore
//! use folio_core::FolioConfig;
//! use folio_server::{create_server, create_state};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FolioConfig::load()?;
//!     let state = create_state(&config).await?;
//!     let app = create_server(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod factory;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use factory::{create_state, create_store};
pub use state::AppState;

use std::time::Duration;

use axum::{middleware as axum_middleware, Router};
use folio_core::config::ServerConfig;
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware, using default server
/// settings.
pub fn create_server(state: AppState) -> Router {
    create_server_with_config(state, &ServerConfig::default())
}

/// Create the server with all routes and middleware.
pub fn create_server_with_config(state: AppState, config: &ServerConfig) -> Router {
    routes::create_router(state)
        .layer(middleware::timeout_layer(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
