//! Line-oriented text analysis: keywords, boilerplate detection and passages

pub mod heading;
pub mod keywords;
pub mod passage;

pub use heading::{HeadingClassifier, DEFAULT_METADATA_TERMS};
pub use keywords::{extract_keywords, Keywords};
pub use passage::{split_lines, Line, PassageMatcher, Passages, MIN_PASSAGE_CHARS};

/// Decode fetched object bytes as text, replacing invalid UTF-8
pub fn decode_document(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
