//! In-memory object store

use super::ObjectStore;
use crate::error::{DocQueryError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Object store backed by a map of key to bytes
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, Vec<u8>>,
    list_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object
    pub fn with_document(mut self, key: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.objects.insert(key.into(), content.into());
        self
    }

    /// Number of list calls served so far
    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of fetch calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn store_type(&self) -> &'static str {
        "memory"
    }

    async fn list_documents(&self, prefix: &str) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn fetch_document(&self, key: &str) -> Result<Vec<u8>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| DocQueryError::document_fetch(key, "no such key"))
    }
}
