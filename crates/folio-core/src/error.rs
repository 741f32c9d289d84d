//! Error types for folio operations.
//!
//! Every backend failure is folded into [`FolioError`] with a structured
//! [`ErrorCode`], so callers can tell a missing document apart from a broken
//! connection without matching on driver-specific error types.

use thiserror::Error;

/// Result type alias for folio operations.
pub type FolioResult<T> = Result<T, FolioError>;

/// Main error type for all folio operations.
#[derive(Error, Debug)]
pub enum FolioError {
    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Document not found.
    #[error("Document not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        doc_id: Option<i64>,
    },

    /// Collection operation failed.
    #[error("Collection error: {message}")]
    Collection {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network error.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Provider not supported.
    #[error("Provider not supported: {provider}")]
    UnsupportedProvider { provider: String },

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,

    // Document (DOC_xxx)
    DocNotFound,
    DocCorrupted,
    DocDuplicateVersion,

    // Collection (COL_xxx)
    ColConnectionFailed,
    ColOperationFailed,

    // Database (DB_xxx)
    DbOperationFailed,

    // Network (NET_xxx)
    NetTimeout,
    NetConnectionFailed,

    // Parse (PARSE_xxx)
    ParseInvalidJson,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::DocNotFound => "DOC_001",
            ErrorCode::DocCorrupted => "DOC_002",
            ErrorCode::DocDuplicateVersion => "DOC_003",
            ErrorCode::ColConnectionFailed => "COL_001",
            ErrorCode::ColOperationFailed => "COL_002",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::NetConnectionFailed => "NET_002",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl FolioError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: None,
        }
    }

    /// Create a not found error for a document identifier.
    pub fn not_found(doc_id: i64) -> Self {
        Self::NotFound {
            message: format!("Document with doc_id '{}' not found", doc_id),
            code: ErrorCode::DocNotFound,
            doc_id: Some(doc_id),
        }
    }

    /// Create a collection error.
    pub fn collection(message: impl Into<String>) -> Self {
        Self::Collection {
            message: message.into(),
            code: ErrorCode::ColOperationFailed,
            source: None,
        }
    }

    /// Create a collection connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Collection {
            message: message.into(),
            code: ErrorCode::ColConnectionFailed,
            source: None,
        }
    }

    /// Create a duplicate version error.
    pub fn duplicate_version(doc_id: i64, doc_version: i64) -> Self {
        Self::Collection {
            message: format!(
                "Version {} of document {} already exists",
                doc_version, doc_id
            ),
            code: ErrorCode::DocDuplicateVersion,
            source: None,
        }
    }

    /// Create a corrupted record error (stored data that does not decode).
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Collection {
            message: message.into(),
            code: ErrorCode::DocCorrupted,
            source: None,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Create an API error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Collection { code, .. } => *code,
            Self::Database { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            Self::Serialization(_) => ErrorCode::ParseInvalidJson,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether this error is a "not found" outcome rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::NotFound { .. } => Some("Please check the doc_id and doc_version"),
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Collection {
                code: ErrorCode::ColConnectionFailed,
                ..
            } => Some("Please check your collection connection settings"),
            Self::Collection {
                code: ErrorCode::DocDuplicateVersion,
                ..
            } => Some("Another writer stored this version first; retry the store"),
            Self::Configuration(_) => Some("Please check your folio configuration"),
            _ => None,
        }
    }

    /// Convert from HTTP status code (for client errors).
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            400 => Self::Validation {
                message: body.to_string(),
                code: ErrorCode::ValInvalidInput,
                suggestion: Some("Please check your request parameters".to_string()),
            },
            404 => Self::NotFound {
                message: body.to_string(),
                code: ErrorCode::DocNotFound,
                doc_id: None,
            },
            408 | 504 => Self::Network {
                message: body.to_string(),
                code: ErrorCode::NetTimeout,
                source: None,
            },
            _ => Self::Internal(format!("HTTP {}: {}", status, body)),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for FolioError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for FolioError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        // 11000 is the server's duplicate key code.
        let code = match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == 11000 => {
                ErrorCode::DocDuplicateVersion
            }
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
                ErrorCode::ColConnectionFailed
            }
            ErrorKind::BsonDeserialization(_) => ErrorCode::DocCorrupted,
            _ => ErrorCode::ColOperationFailed,
        };

        Self::Collection {
            message: err.to_string(),
            code,
            source: Some(Box::new(err)),
        }
    }
}
