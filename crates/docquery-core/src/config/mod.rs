//! Configuration management

use crate::error::{DocQueryError, Result};
use crate::reply::{ReplyBook, GENERIC_GREETING};
use crate::text::{HeadingClassifier, DEFAULT_METADATA_TERMS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where documents are read from
    #[serde(default)]
    pub store: StoreConfig,

    /// Store credentials (environment only, never written to disk)
    #[serde(default, skip_serializing)]
    pub credentials: Credentials,

    /// Query engine tuning
    #[serde(default)]
    pub engine: EngineConfig,

    /// Boilerplate detection
    #[serde(default)]
    pub headings: HeadingConfig,

    /// Greeting and fallback replies
    #[serde(default)]
    pub replies: ReplyBook,
}

/// Object store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    S3,
    File,
}

impl Default for StoreBackend {
    fn default() -> Self {
        match std::env::var("DOCQUERY_STORE").as_deref() {
            Ok("file") => StoreBackend::File,
            _ => StoreBackend::S3,
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Bucket name (s3 backend)
    pub bucket: String,

    /// Only keys starting with this prefix are considered
    pub prefix: String,

    /// Extension allow-list for keys treated as documents
    pub extensions: Vec<String>,

    /// AWS region (s3 backend)
    pub region: String,

    /// S3-compatible endpoint; switches to path-style URLs
    pub endpoint: Option<String>,

    /// Directory acting as the bucket (file backend)
    pub root: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            bucket: std::env::var("DOCQUERY_BUCKET").unwrap_or_default(),
            prefix: std::env::var("DOCQUERY_PREFIX").unwrap_or_default(),
            extensions: default_extensions(),
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint: std::env::var("DOCQUERY_ENDPOINT").ok(),
            root: std::env::var("DOCQUERY_ROOT").ok().map(PathBuf::from),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec![".txt".to_string(), ".pdf".to_string()]
}

/// Store credentials
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
            session_token: std::env::var("AWS_SESSION_TOKEN").ok(),
        }
    }
}

impl Credentials {
    /// No credentials: requests are sent unsigned
    pub fn anonymous() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
        }
    }

    /// Access key pair, if both halves are present
    pub fn key_pair(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some((id.as_str(), secret.as_str()))
            }
            _ => None,
        }
    }
}

/// Query engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on in-flight document fetches
    pub max_concurrent_fetches: usize,

    /// Whole-query timeout in seconds (0 disables it)
    pub timeout_secs: u64,

    /// Neighbouring lines added on each side of a matched line
    pub context_lines: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 8,
            timeout_secs: 30,
            context_lines: 0,
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Boilerplate detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingConfig {
    #[serde(default = "default_metadata_terms")]
    pub metadata_terms: Vec<String>,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            metadata_terms: default_metadata_terms(),
        }
    }
}

fn default_metadata_terms() -> Vec<String> {
    DEFAULT_METADATA_TERMS.iter().map(|s| s.to_string()).collect()
}

impl HeadingConfig {
    pub fn classifier(&self) -> Result<HeadingClassifier> {
        HeadingClassifier::new(self.metadata_terms.as_slice())
    }
}

impl Config {
    /// Load config from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            tracing::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path (`DOCQUERY_CONFIG` overrides)
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("DOCQUERY_CONFIG") {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.engine.max_concurrent_fetches == 0 {
            return Err(DocQueryError::Config(
                "engine.max_concurrent_fetches must be at least 1".to_string(),
            ));
        }

        match self.store.backend {
            StoreBackend::S3 if self.store.bucket.trim().is_empty() => {
                return Err(DocQueryError::Config(
                    "store.bucket is required for the s3 backend (or set DOCQUERY_BUCKET)"
                        .to_string(),
                ));
            }
            StoreBackend::File => match &self.store.root {
                Some(root) if root.is_dir() => {}
                Some(root) => {
                    return Err(DocQueryError::Config(format!(
                        "store.root is not a directory: {}",
                        root.display()
                    )));
                }
                None => {
                    return Err(DocQueryError::Config(
                        "store.root is required for the file backend (or set DOCQUERY_ROOT)"
                            .to_string(),
                    ));
                }
            },
            _ => {}
        }

        if !self.replies.greeting_keywords.is_empty()
            && self.replies.greeting(GENERIC_GREETING).is_none()
        {
            return Err(DocQueryError::Config(format!(
                "replies.greetings must define a `{}` reply",
                GENERIC_GREETING
            )));
        }

        Ok(())
    }
}
