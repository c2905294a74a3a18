//! Canned replies: greetings and the fallback answer

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Greeting whose reply answers any question that merely contains a greeting
pub const GENERIC_GREETING: &str = "hello";

/// Answer returned when no passage matches
pub const DEFAULT_FALLBACK: &str =
    "Sorry, I couldn't find anything useful related to your question.";

/// Immutable greeting and fallback text, loaded once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyBook {
    /// Exact greeting (lower-case) to reply
    #[serde(default = "default_greetings")]
    pub greetings: BTreeMap<String, String>,

    /// Substrings that mark a question as small talk
    #[serde(default = "default_greeting_keywords")]
    pub greeting_keywords: Vec<String>,

    /// Reply when nothing relevant was found
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for ReplyBook {
    fn default() -> Self {
        Self {
            greetings: default_greetings(),
            greeting_keywords: default_greeting_keywords(),
            fallback: default_fallback(),
        }
    }
}

fn default_greetings() -> BTreeMap<String, String> {
    [
        ("hello", "Hi there! How can I help you today?"),
        ("hi", "Hello! What would you like to know?"),
        ("hey", "Hey! Ask me anything about our documents."),
        ("greetings", "Greetings! How may I assist you today?"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_greeting_keywords() -> Vec<String> {
    ["hello", "hi", "hey", "greetings"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK.to_string()
}

impl ReplyBook {
    /// Reply for an exact greeting key
    pub fn greeting(&self, key: &str) -> Option<&str> {
        self.greetings.get(key).map(String::as_str)
    }

    /// Detect small talk and return its canned reply.
    ///
    /// Exact greetings get their own reply. Any question that merely contains
    /// a greeting keyword (including inside a longer word) gets the generic
    /// greeting reply.
    pub fn try_greeting(&self, question: &str) -> Option<&str> {
        let normalized = question.trim().to_lowercase();

        if let Some(reply) = self.greeting(&normalized) {
            return Some(reply);
        }

        if self
            .greeting_keywords
            .iter()
            .any(|k| !k.is_empty() && normalized.contains(k.to_lowercase().as_str()))
        {
            return self.greeting(GENERIC_GREETING);
        }

        None
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}
