//! Passage extraction from document text

use super::heading::HeadingClassifier;
use super::keywords::Keywords;
use std::collections::HashSet;

/// Trimmed lines must be longer than this (in characters) to be a passage
pub const MIN_PASSAGE_CHARS: usize = 30;

/// A single line of a document
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    pub index: usize,
    pub raw: &'a str,
    pub trimmed: &'a str,
}

/// Split document text on line breaks
pub fn split_lines(text: &str) -> Vec<Line<'_>> {
    text.split('\n')
        .enumerate()
        .map(|(index, raw)| Line {
            index,
            raw,
            trimmed: raw.trim(),
        })
        .collect()
}

/// Insertion-ordered, duplicate-free passages from one document
#[derive(Debug, Clone, Default)]
pub struct Passages {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl Passages {
    pub fn insert(&mut self, passage: String) -> bool {
        if self.seen.contains(&passage) {
            return false;
        }
        self.seen.insert(passage.clone());
        self.items.push(passage);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn join(&self, separator: &str) -> String {
        self.items.join(separator)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl PartialEq for Passages {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Passages {}

/// Scans document lines for keyword hits that are real content
#[derive(Debug, Clone, Default)]
pub struct PassageMatcher {
    classifier: HeadingClassifier,
    context_lines: usize,
}

impl PassageMatcher {
    pub fn new(classifier: HeadingClassifier) -> Self {
        Self {
            classifier,
            context_lines: 0,
        }
    }

    /// Expand each match to `n` neighbouring lines on either side.
    ///
    /// Zero (the default) keeps every matched line as its own passage.
    pub fn with_context_lines(mut self, n: usize) -> Self {
        self.context_lines = n;
        self
    }

    /// Content-quality check: long enough and not boilerplate
    pub fn is_good_line(&self, line: &str) -> bool {
        line.trim().chars().count() > MIN_PASSAGE_CHARS && !self.classifier.is_boilerplate(line)
    }

    /// Collect the passages of `text` that mention any keyword
    pub fn match_passages(&self, text: &str, keywords: &Keywords) -> Passages {
        let mut passages = Passages::default();
        if keywords.is_empty() {
            return passages;
        }

        let lines = split_lines(text);
        for line in &lines {
            let is_match = keywords.any_in(&line.raw.to_lowercase());
            if !is_match || !self.is_good_line(line.raw) {
                continue;
            }

            if self.context_lines == 0 {
                passages.insert(line.trimmed.to_string());
            } else {
                passages.insert(self.window(&lines, line.index));
            }
        }

        passages
    }

    fn window(&self, lines: &[Line<'_>], center: usize) -> String {
        let start = center.saturating_sub(self.context_lines);
        let end = (center + self.context_lines + 1).min(lines.len());

        lines[start..end]
            .iter()
            .map(|l| l.trimmed)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
