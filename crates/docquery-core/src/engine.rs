//! Question answering over the document store
//!
//! A question is first checked against the canned greetings. Otherwise its
//! keywords are matched line by line against every document in the store,
//! fetched concurrently, and the surviving passages are joined in ascending
//! document key order. One unreadable document never fails the whole query;
//! an unreachable store does.

use crate::config::Config;
use crate::error::{DocQueryError, Result};
use crate::reply::ReplyBook;
use crate::store::{open_store, Document, DocumentFilter, ObjectStore};
use crate::text::{decode_document, extract_keywords, Keywords, PassageMatcher, Passages};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Separator between passages of one document
pub const PASSAGE_SEPARATOR: &str = "\n";

/// Separator between documents
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Inbound query payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub question: Option<String>,
}

/// Outbound query payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
}

/// How an answer was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKind {
    Greeting,
    Passages,
    Fallback,
}

/// Final answer to a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub kind: AnswerKind,

    /// Keys of documents that contributed passages, ascending
    pub sources: Vec<String>,
}

impl Answer {
    fn greeting(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: AnswerKind::Greeting,
            sources: Vec::new(),
        }
    }

    fn fallback(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: AnswerKind::Fallback,
            sources: Vec::new(),
        }
    }

    pub fn to_response(&self) -> QueryResponse {
        QueryResponse {
            answer: self.text.clone(),
        }
    }
}

/// Passages found in one document
#[derive(Debug, Clone)]
pub struct DocumentMatch {
    pub key: String,
    pub passages: Passages,
}

/// Join per-document passages; documents must already be in key order
pub fn join_matches(matches: &[DocumentMatch]) -> String {
    matches
        .iter()
        .filter(|m| !m.passages.is_empty())
        .map(|m| m.passages.join(PASSAGE_SEPARATOR))
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}

/// Orchestrates greeting detection, document fan-out and answer composition
pub struct RelevanceEngine {
    store: Arc<dyn ObjectStore>,
    matcher: PassageMatcher,
    replies: ReplyBook,
    prefix: String,
    filter: DocumentFilter,
    max_concurrent: usize,
    timeout: Option<Duration>,
}

impl RelevanceEngine {
    /// Create an engine with default matching rules and replies
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            matcher: PassageMatcher::default(),
            replies: ReplyBook::default(),
            prefix: String::new(),
            filter: DocumentFilter::new(&[".txt", ".pdf"]),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout: None,
        }
    }

    /// Build the store and engine described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let store = open_store(&config.store, &config.credentials)?;
        Self::with_config(store, config)
    }

    /// Build an engine over an existing store using `config` for everything else
    pub fn with_config(store: Arc<dyn ObjectStore>, config: &Config) -> Result<Self> {
        let matcher = PassageMatcher::new(config.headings.classifier()?)
            .with_context_lines(config.engine.context_lines);

        Ok(Self::new(store)
            .with_matcher(matcher)
            .with_replies(config.replies.clone())
            .with_prefix(config.store.prefix.clone())
            .with_extensions(config.store.extensions.as_slice())
            .with_max_concurrent_fetches(config.engine.max_concurrent_fetches)
            .with_timeout(config.engine.timeout()))
    }

    pub fn with_matcher(mut self, matcher: PassageMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_replies(mut self, replies: ReplyBook) -> Self {
        self.replies = replies;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.filter = DocumentFilter::new(extensions);
        self
    }

    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn replies(&self) -> &ReplyBook {
        &self.replies
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Document keys under the configured prefix, filtered and ascending
    pub async fn list_documents(&self) -> Result<Vec<String>> {
        let keys = self
            .store
            .list_documents(&self.prefix)
            .await
            .map_err(|e| match e {
                DocQueryError::StoreUnavailable(_) => e,
                other => DocQueryError::StoreUnavailable(other.to_string()),
            })?;
        let total = keys.len();
        let selected = self.filter.select(keys);
        tracing::info!(
            "Listed {} objects under '{}', {} documents selected",
            total,
            self.prefix,
            selected.len()
        );
        Ok(selected)
    }

    /// Whether `key` is under the configured prefix and passes the extension allow-list
    pub fn is_document(&self, key: &str) -> bool {
        key.starts_with(&self.prefix) && self.filter.accepts(key)
    }

    /// Fetch and decode a single document; keys outside the searched scope are refused
    pub async fn fetch_document(&self, key: &str) -> Result<Document> {
        if !self.is_document(key) {
            return Err(DocQueryError::InvalidRequest(format!(
                "Not a searchable document: {}",
                key
            )));
        }
        self.load_document(key).await
    }

    async fn load_document(&self, key: &str) -> Result<Document> {
        let bytes = self.store.fetch_document(key).await?;
        Ok(Document::new(key.to_string(), decode_document(&bytes)))
    }

    /// Answer a question
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        if question.trim().is_empty() {
            return Err(DocQueryError::InvalidRequest(
                "Question is required".to_string(),
            ));
        }

        if let Some(reply) = self.replies.try_greeting(question) {
            tracing::debug!("Greeting matched, skipping document search");
            return Ok(Answer::greeting(reply));
        }

        let keywords = extract_keywords(question);
        if keywords.is_empty() {
            tracing::debug!("No usable keywords in question, returning fallback");
            return Ok(Answer::fallback(self.replies.fallback()));
        }

        let matches = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.scan(question, &keywords))
                .await
                .map_err(|_| {
                    tracing::warn!(question = %question, "Query timed out, discarding partial results");
                    DocQueryError::Timeout(limit.as_secs())
                })??,
            None => self.scan(question, &keywords).await?,
        };

        let text = join_matches(&matches);
        if text.is_empty() {
            return Ok(Answer::fallback(self.replies.fallback()));
        }

        Ok(Answer {
            text,
            kind: AnswerKind::Passages,
            sources: matches
                .into_iter()
                .filter(|m| !m.passages.is_empty())
                .map(|m| m.key)
                .collect(),
        })
    }

    /// List, fetch and match every document; results come back in key order
    async fn scan(&self, question: &str, keywords: &Keywords) -> Result<Vec<DocumentMatch>> {
        let keys = self.list_documents().await.map_err(|e| {
            tracing::error!(question = %question, error = %e, "Document listing failed");
            e
        })?;

        let mut results: Vec<_> = stream::iter(keys.into_iter().enumerate())
            .map(|(idx, key)| async move {
                tracing::debug!("Scanning document {}", key);
                let result = self.scan_document(&key, keywords).await;
                (idx, key, result)
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        // Completion order is arbitrary; restore listing order
        results.sort_by_key(|(idx, _, _)| *idx);

        let mut matches = Vec::with_capacity(results.len());
        for (_, key, result) in results {
            match result {
                Ok(passages) => matches.push(DocumentMatch { key, passages }),
                Err(e) => {
                    tracing::warn!(key = %key, question = %question, error = %e, "Skipping document");
                }
            }
        }

        Ok(matches)
    }

    async fn scan_document(&self, key: &str, keywords: &Keywords) -> Result<Passages> {
        let document = self.load_document(key).await?;
        Ok(self.matcher.match_passages(&document.text, keywords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn passages(lines: &[&str]) -> Passages {
        let mut p = Passages::default();
        for line in lines {
            p.insert(line.to_string());
        }
        p
    }

    #[test]
    fn test_join_matches_separators() {
        let matches = vec![
            DocumentMatch {
                key: "a.txt".to_string(),
                passages: passages(&["first line of a", "second line of a"]),
            },
            DocumentMatch {
                key: "b.txt".to_string(),
                passages: Passages::default(),
            },
            DocumentMatch {
                key: "c.txt".to_string(),
                passages: passages(&["only line of c"]),
            },
        ];
        assert_eq!(
            join_matches(&matches),
            "first line of a\nsecond line of a\n\nonly line of c"
        );
        assert_eq!(join_matches(&[]), "");
    }

    #[test]
    fn test_query_request_tolerates_missing_question() {
        let request: QueryRequest = serde_json::from_str("{}").unwrap();
        assert!(request.question.is_none());
        let response = serde_json::to_string(&QueryResponse {
            answer: "ok".to_string(),
        })
        .unwrap();
        assert_eq!(response, r#"{"answer":"ok"}"#);
    }

    #[tokio::test]
    async fn test_whitespace_question_is_invalid() {
        let store = Arc::new(MemoryStore::new());
        let engine = RelevanceEngine::new(store.clone());
        let err = engine.answer("   ").await.unwrap_err();
        assert!(matches!(err, DocQueryError::InvalidRequest(_)));
        assert_eq!(store.list_count(), 0);
    }

    #[tokio::test]
    async fn test_extension_filter_and_prefix_apply() {
        let line = "Customers can request a refund by contacting our support desk.";
        let store = Arc::new(
            MemoryStore::new()
                .with_document("docs/faq.txt", line)
                .with_document("docs/logo.png", line)
                .with_document("archive/old.txt", line),
        );
        let engine = RelevanceEngine::new(store.clone()).with_prefix("docs/");

        assert_eq!(engine.list_documents().await.unwrap(), vec!["docs/faq.txt"]);

        let answer = engine.answer("refund").await.unwrap();
        assert_eq!(answer.kind, AnswerKind::Passages);
        assert_eq!(answer.text, line);
        assert_eq!(answer.sources, vec!["docs/faq.txt"]);
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_document_is_scoped_to_searchable_keys() {
        let store = Arc::new(
            MemoryStore::new()
                .with_document("docs/faq.txt", "Frequently asked questions")
                .with_document("docs/logo.png", "binary")
                .with_document("private/keys.env", "AWS_SECRET_ACCESS_KEY=topsecret"),
        );
        let engine = RelevanceEngine::new(store.clone()).with_prefix("docs/");

        assert!(engine.is_document("docs/faq.txt"));
        assert!(!engine.is_document("docs/logo.png"));
        assert!(!engine.is_document("private/keys.env"));

        let document = engine.fetch_document("docs/faq.txt").await.unwrap();
        assert_eq!(document.text, "Frequently asked questions");

        for key in ["private/keys.env", "docs/logo.png"] {
            let err = engine.fetch_document(key).await.unwrap_err();
            assert!(matches!(err, DocQueryError::InvalidRequest(_)));
        }
        assert_eq!(store.fetch_count(), 1);
    }
}
