//! folio-server - HTTP API server binary.

use std::net::SocketAddr;

use folio_core::FolioConfig;
use folio_server::{create_server_with_config, create_state, logging};
use tokio::signal;
use tracing::{error, info};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // FOLIO_CONFIG file first, then FOLIO_* overrides
    let config = FolioConfig::load()?;

    // Initialize tracing
    logging::init_tracing(&config.server)?;

    info!(
        "Using {} collection '{}'",
        config.collection.provider, config.collection.collection_name
    );
    let state = create_state(&config).await?;
    let app = create_server_with_config(state, &config.server);

    // Start server
    let addr: SocketAddr = config.server.bind_address().parse()?;
    info!("Starting folio-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received");
        })
        .await?;

    info!("Server stopped cleanly");
    Ok(())
}
