//! Boilerplate line detection
//!
//! Headings, titles and document metadata artifacts (page footers, author
//! lines, copyright notices) are never useful as answers. A line counts as
//! boilerplate when it is short, shouted in capitals, or mentions one of the
//! configured metadata terms as a whole word.

use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;

/// Metadata terms that mark a line as boilerplate
pub const DEFAULT_METADATA_TERMS: &[&str] = &[
    "index",
    "page",
    "title",
    "created",
    "copyright",
    "confidential",
    "revision",
    "producer",
    "author",
];

/// Lines with this many words or fewer are headings
pub const MAX_HEADING_WORDS: usize = 4;

lazy_static! {
    static ref DEFAULT_METADATA_RE: Regex = metadata_pattern(DEFAULT_METADATA_TERMS).unwrap();
}

fn metadata_pattern<S: AsRef<str>>(terms: &[S]) -> std::result::Result<Regex, regex::Error> {
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t.as_ref().trim()))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
}

/// Classifies lines as boilerplate (heading/metadata) or content
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    metadata_re: Option<Regex>,
}

impl HeadingClassifier {
    /// Create a classifier with a custom metadata term list
    pub fn new<S: AsRef<str>>(metadata_terms: &[S]) -> Result<Self> {
        let terms: Vec<&str> = metadata_terms
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| !t.trim().is_empty())
            .collect();

        let metadata_re = if terms.is_empty() {
            None
        } else {
            Some(metadata_pattern(&terms)?)
        };

        Ok(Self { metadata_re })
    }

    /// Whether the line is a heading or metadata rather than content
    pub fn is_boilerplate(&self, line: &str) -> bool {
        let trimmed = line.trim();

        if trimmed.split_whitespace().count() <= MAX_HEADING_WORDS {
            return true;
        }

        // Also true for lines without any letters
        if trimmed == trimmed.to_uppercase() {
            return true;
        }

        self.metadata_re
            .as_ref()
            .map(|re| re.is_match(trimmed))
            .unwrap_or(false)
    }
}

impl Default for HeadingClassifier {
    fn default() -> Self {
        Self {
            metadata_re: Some(DEFAULT_METADATA_RE.clone()),
        }
    }
}
