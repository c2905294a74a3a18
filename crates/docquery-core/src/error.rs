//! Error types for docquery

use thiserror::Error;

/// Result type alias using DocQueryError
pub type Result<T> = std::result::Result<T, DocQueryError>;

/// Error type alias for convenience
pub type Error = DocQueryError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const STORE_UNAVAILABLE: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// HTTP-equivalent status codes surfaced to callers of the query operation
pub mod status_codes {
    pub const BAD_REQUEST: u16 = 400;
    pub const INTERNAL_ERROR: u16 = 500;
}

/// Main error type for docquery
#[derive(Debug, Error)]
pub enum DocQueryError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to fetch document {key}: {message}")]
    DocumentFetch { key: String, message: String },

    #[error("Object store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Query timed out after {0} seconds")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl DocQueryError {
    /// Build a per-document fetch failure
    pub fn document_fetch(key: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::DocumentFetch {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidRequest(_) | Self::InvalidInput(_) | Self::Config(_) => {
                exit_codes::INVALID_INPUT
            }
            Self::StoreUnavailable(_) | Self::Timeout(_) => exit_codes::STORE_UNAVAILABLE,
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// HTTP-equivalent status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) | Self::InvalidInput(_) => status_codes::BAD_REQUEST,
            _ => status_codes::INTERNAL_ERROR,
        }
    }

    /// Whether the caller can fix this error by changing the request
    pub fn is_client_error(&self) -> bool {
        self.status_code() == status_codes::BAD_REQUEST
    }
}
