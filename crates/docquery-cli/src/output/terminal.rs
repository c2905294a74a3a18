//! Plain terminal output

use docquery_core::Answer;

pub fn format_answer(answer: &Answer, show_sources: bool) -> String {
    let mut output = String::new();
    output.push_str(&answer.text);
    output.push('\n');

    if show_sources && !answer.sources.is_empty() {
        output.push_str("\nSources:\n");
        for key in &answer.sources {
            output.push_str(&format!("  {}\n", key));
        }
    }

    output
}

pub fn format_documents(keys: &[String]) -> String {
    if keys.is_empty() {
        return "No documents found\n".to_string();
    }

    let mut output = String::new();
    for key in keys {
        output.push_str(key);
        output.push('\n');
    }
    output
}
