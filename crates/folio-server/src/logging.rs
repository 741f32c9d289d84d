//! Tracing subscriber setup for the server binary.

use std::fs::OpenOptions;
use std::sync::Mutex;

use folio_core::config::{LogFormat, ServerConfig};
use folio_core::error::{FolioError, FolioResult};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directives applied when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "info,folio_server=debug";

/// Filter from `RUST_LOG`, falling back to [`DEFAULT_DIRECTIVES`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber: text or JSON, to stdout or appended to
/// `log_file`.
pub fn init_tracing(config: &ServerConfig) -> FolioResult<()> {
    let writer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let registry = tracing_subscriber::registry().with(env_filter());
    let result = match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_ansi(config.log_file.is_none())
                    .with_writer(writer),
            )
            .try_init(),
    };

    result.map_err(|e| FolioError::Configuration(format!("Failed to initialize logging: {}", e)))
}
