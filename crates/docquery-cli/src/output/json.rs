//! JSON output format

use docquery_core::Answer;

/// `{"answer": ...}`, or the full answer when sources are requested
pub fn format_answer(answer: &Answer, show_sources: bool) -> String {
    let rendered = if show_sources {
        serde_json::to_string_pretty(answer)
    } else {
        serde_json::to_string_pretty(&answer.to_response())
    };
    rendered.unwrap_or_else(|_| "{}".to_string()) + "\n"
}

pub fn format_documents(keys: &[String]) -> String {
    serde_json::to_string_pretty(keys).unwrap_or_else(|_| "[]".to_string()) + "\n"
}
