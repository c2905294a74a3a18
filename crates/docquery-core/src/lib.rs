//! Docquery Core Library
//!
//! Answers free-text questions from plain-text documents kept in an object
//! store.
//!
//! # Features
//! - Canned replies for greetings, checked before any store access
//! - Keyword extraction and line-level passage matching
//! - Boilerplate (heading/metadata) line filtering
//! - Bounded concurrent document fetches with per-document failure isolation
//! - S3, local directory and in-memory stores

pub mod config;
pub mod engine;
pub mod error;
pub mod reply;
pub mod store;
pub mod text;

pub use config::{Config, Credentials, EngineConfig, HeadingConfig, StoreBackend, StoreConfig};
pub use engine::{
    join_matches, Answer, AnswerKind, DocumentMatch, QueryRequest, QueryResponse,
    RelevanceEngine,
};
pub use error::{DocQueryError, Error, Result};
pub use reply::ReplyBook;
pub use store::{
    open_store, Document, DocumentFilter, FileStore, MemoryStore, ObjectStore, S3Store,
};
pub use text::{
    extract_keywords, HeadingClassifier, Keywords, PassageMatcher, Passages,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "docquery";
