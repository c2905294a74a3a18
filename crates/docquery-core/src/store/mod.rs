//! Object store abstraction
//!
//! The engine only needs two capabilities from wherever documents live:
//! listing the keys under a prefix and fetching one object's bytes. Backends:
//! - S3 (and S3-compatible services) over HTTP
//! - Local directory acting as a bucket
//! - In-memory map (tests, demos)

use crate::config::{Credentials, StoreBackend, StoreConfig};
use crate::error::Result;
use std::sync::Arc;

pub mod file;
pub mod memory;
pub mod s3;
mod sigv4;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use s3::S3Store;

/// Object store trait - every document backend implements this
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Backend identifier (e.g., "s3", "file", "memory")
    fn store_type(&self) -> &'static str;

    /// List every object key under `prefix`
    async fn list_documents(&self, prefix: &str) -> Result<Vec<String>>;

    /// Fetch the raw bytes of one object
    async fn fetch_document(&self, key: &str) -> Result<Vec<u8>>;
}

/// A fetched document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Storage key, unique within the bucket
    pub key: String,

    /// Decoded text content
    pub text: String,
}

impl Document {
    pub fn new(key: String, text: String) -> Self {
        Self { key, text }
    }
}

/// Decides which listed keys are treated as documents
#[derive(Debug, Clone)]
pub struct DocumentFilter {
    extensions: Vec<String>,
}

impl DocumentFilter {
    /// Create a filter from an extension allow-list (".txt" or "txt")
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        let extensions = extensions
            .iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .map(|e| format!(".{}", e))
            .collect();
        Self { extensions }
    }

    /// Whether the key names a document. An empty allow-list accepts every key.
    pub fn accepts(&self, key: &str) -> bool {
        if key.ends_with('/') {
            return false;
        }
        if self.extensions.is_empty() {
            return true;
        }
        let lower = key.to_lowercase();
        self.extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
    }

    /// Filter, sort ascending and dedup a listing
    pub fn select(&self, keys: Vec<String>) -> Vec<String> {
        let mut selected: Vec<String> = keys.into_iter().filter(|k| self.accepts(k)).collect();
        selected.sort();
        selected.dedup();
        selected
    }
}

/// Build the configured store backend
pub fn open_store(config: &StoreConfig, credentials: &Credentials) -> Result<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.backend {
        StoreBackend::S3 => Arc::new(S3Store::from_config(config, credentials)?),
        StoreBackend::File => Arc::new(FileStore::from_config(config)?),
    };
    tracing::debug!("Opened {} store", store.store_type());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_normalizes_extensions() {
        let filter = DocumentFilter::new(&[".TXT", "pdf", "  "]);
        assert!(filter.accepts("docs/refunds.txt"));
        assert!(filter.accepts("docs/REFUNDS.TXT"));
        assert!(filter.accepts("docs/manual.pdf"));
        assert!(!filter.accepts("docs/image.png"));
        assert!(!filter.accepts("docs/txt"));
    }

    #[test]
    fn test_filter_skips_folder_markers() {
        let filter = DocumentFilter::new::<&str>(&[]);
        assert!(filter.accepts("docs/anything.bin"));
        assert!(!filter.accepts("docs/"));
    }

    #[test]
    fn test_select_sorts_and_dedups() {
        let filter = DocumentFilter::new(&[".txt"]);
        let keys = vec![
            "b.txt".to_string(),
            "a.txt".to_string(),
            "c.csv".to_string(),
            "a.txt".to_string(),
        ];
        assert_eq!(filter.select(keys), vec!["a.txt", "b.txt"]);
    }
}
