//! Keyword extraction from free-text questions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_WORD_RE: Regex = Regex::new(r"[^\w\s]").unwrap();
}

/// Tokens must be strictly longer than this (in characters) to become keywords
pub const MIN_KEYWORD_LEN: usize = 3;

/// Insertion-ordered, duplicate-free set of lower-cased search terms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords {
    terms: Vec<String>,
}

impl Keywords {
    /// Add a term, ignoring duplicates
    pub fn insert(&mut self, term: String) -> bool {
        if self.terms.contains(&term) {
            return false;
        }
        self.terms.push(term);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Whether any keyword occurs as a substring of the already lower-cased text
    pub fn any_in(&self, lowered: &str) -> bool {
        self.terms.iter().any(|term| lowered.contains(term.as_str()))
    }
}

impl<'a> IntoIterator for &'a Keywords {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

/// Derive search terms from a question.
///
/// Punctuation is stripped, the remainder is split on whitespace, and tokens
/// longer than [`MIN_KEYWORD_LEN`] characters are lower-cased and kept in order
/// of first appearance.
pub fn extract_keywords(question: &str) -> Keywords {
    let cleaned = NON_WORD_RE.replace_all(question, "");

    let mut keywords = Keywords::default();
    for token in cleaned.split_whitespace() {
        if token.chars().count() > MIN_KEYWORD_LEN {
            keywords.insert(token.to_lowercase());
        }
    }
    keywords
}
