//! Local directory store
//!
//! Treats a directory as a bucket: keys are `/`-separated paths relative to
//! the root.

use super::ObjectStore;
use crate::config::StoreConfig;
use crate::error::{DocQueryError, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory-backed object store
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let root = config.root.clone().ok_or_else(|| {
            DocQueryError::Config("file store requires `store.root`".to_string())
        })?;
        Ok(Self::new(root))
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(DocQueryError::InvalidInput(format!(
                "Key escapes store root: {}",
                key
            )));
        }
        Ok(self.root.join(relative))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn key_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Some(parts.join("/"))
}

#[async_trait]
impl ObjectStore for FileStore {
    fn store_type(&self) -> &'static str {
        "file"
    }

    async fn list_documents(&self, prefix: &str) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(DocQueryError::StoreUnavailable(format!(
                "Store root is not a directory: {}",
                self.root.display()
            )));
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
        {
            let entry = entry.map_err(|e| DocQueryError::StoreUnavailable(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(key) = key_for(&self.root, entry.path()) {
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }

        Ok(keys)
    }

    async fn fetch_document(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.resolve(key)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| DocQueryError::document_fetch(key, e))
    }
}
