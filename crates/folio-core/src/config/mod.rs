//! Configuration system for folio.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::error::{FolioError, FolioResult};
use crate::traits::{CollectionConfig, CollectionProvider};

/// Environment variable naming a config file to load before env overrides.
pub const CONFIG_PATH_ENV: &str = "FOLIO_CONFIG";

/// Log output format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Append logs to this file instead of stdout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Log line format.
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            log_file: None,
            log_format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Main folio configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Backing collection.
    pub collection: CollectionConfig,
    /// HTTP server.
    pub server: ServerConfig,
}

impl FolioConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> FolioResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| FolioError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| FolioError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| FolioError::Configuration(e.to_string())),
            _ => Err(FolioError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables over the defaults.
    pub fn from_env() -> FolioResult<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load `FOLIO_CONFIG` if set, then apply environment overrides.
    pub fn load() -> FolioResult<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => Self::from_file(path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values from `lookup` (an environment-like source).
    ///
    /// Unset and empty variables leave the current value untouched.
    pub fn apply_env<F>(&mut self, lookup: F) -> FolioResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        // Collection configuration
        if let Some(provider) = get("FOLIO_COLLECTION_PROVIDER") {
            self.collection.provider = CollectionProvider::from_str(&provider).map_err(|_| {
                FolioError::Configuration(format!("unknown collection provider: {}", provider))
            })?;
        }
        if let Some(url) = get("FOLIO_MONGODB_URI") {
            self.collection.url = url;
        }
        if let Some(database) = get("FOLIO_DATABASE") {
            self.collection.database = database;
        }
        if let Some(name) = get("FOLIO_COLLECTION") {
            self.collection.collection_name = name;
        }
        if let Some(path) = get("FOLIO_SQLITE_PATH") {
            self.collection.path = PathBuf::from(path);
        }

        // Server configuration
        if let Some(host) = get("FOLIO_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("FOLIO_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| FolioError::Configuration(format!("invalid FOLIO_PORT: {}", port)))?;
        }
        if let Some(file) = get("FOLIO_LOG_FILE") {
            self.server.log_file = Some(PathBuf::from(file));
        }
        if let Some(format) = get("FOLIO_LOG_FORMAT") {
            self.server.log_format = LogFormat::from_str(&format).map_err(|_| {
                FolioError::Configuration(format!("invalid FOLIO_LOG_FORMAT: {}", format))
            })?;
        }

        Ok(())
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> FolioConfigBuilder {
        FolioConfigBuilder::default()
    }
}

/// Builder for FolioConfig.
#[derive(Default)]
pub struct FolioConfigBuilder {
    config: FolioConfig,
}

impl FolioConfigBuilder {
    /// Set collection configuration.
    pub fn collection(mut self, config: CollectionConfig) -> Self {
        self.config.collection = config;
        self
    }

    /// Set server configuration.
    pub fn server(mut self, config: ServerConfig) -> Self {
        self.config.server = config;
        self
    }

    /// Set the bind host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the bind port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Set the log file.
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.server.log_file = Some(path.into());
        self
    }

    /// Set the log format.
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.config.server.log_format = format;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> FolioConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = FolioConfig::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.server.log_format, LogFormat::Text);
        assert_eq!(config.collection.url, "mongodb://db:27017");
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[collection]
provider = "mongodb"
url = "mongodb://localhost:27017"

[server]
port = 9000
log_format = "json"
"#
        )
        .unwrap();

        let config = FolioConfig::from_file(file.path()).unwrap();
        assert_eq!(config.collection.provider, CollectionProvider::MongoDB);
        assert_eq!(config.collection.url, "mongodb://localhost:27017");
        assert_eq!(config.collection.database, "knowledge");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.log_format, LogFormat::Json);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "collection:\n  provider: memory\n  collection_name: two").unwrap();

        let config = FolioConfig::from_file(file.path()).unwrap();
        assert_eq!(config.collection.provider, CollectionProvider::Memory);
        assert_eq!(config.collection.collection_name, "two");
    }

    #[test]
    fn test_from_file_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = FolioConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, FolioError::Configuration(_)));
    }

    #[test]
    fn test_apply_env_overrides() {
        let mut config = FolioConfig::default();
        config
            .apply_env(env(&[
                ("FOLIO_COLLECTION_PROVIDER", "Mongo"),
                ("FOLIO_MONGODB_URI", "mongodb://mongo:27017"),
                ("FOLIO_DATABASE", "docs"),
                ("FOLIO_PORT", "3000"),
                ("FOLIO_HOST", ""),
                ("FOLIO_LOG_FORMAT", "JSON"),
            ]))
            .unwrap();

        assert_eq!(config.collection.provider, CollectionProvider::MongoDB);
        assert_eq!(config.collection.url, "mongodb://mongo:27017");
        assert_eq!(config.collection.database, "docs");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.log_format, LogFormat::Json);
    }

    #[test]
    fn test_apply_env_invalid_values() {
        let mut config = FolioConfig::default();
        assert!(config
            .apply_env(env(&[("FOLIO_PORT", "eighty")]))
            .is_err());
        assert!(config
            .apply_env(env(&[("FOLIO_COLLECTION_PROVIDER", "qdrant")]))
            .is_err());
    }

    #[test]
    fn test_builder() {
        let config = FolioConfig::builder()
            .collection(CollectionConfig::memory("docs"))
            .port(8181)
            .log_format(LogFormat::Json)
            .build();

        assert_eq!(config.collection.provider, CollectionProvider::Memory);
        assert_eq!(config.server.port, 8181);
        assert_eq!(config.server.log_format, LogFormat::Json);
    }
}
