//! Output formatting

mod json;
mod terminal;

use crate::app::OutputFormat;
use docquery_core::Answer;

pub fn format_answer(answer: &Answer, format: OutputFormat, show_sources: bool) -> String {
    match format {
        OutputFormat::Json => json::format_answer(answer, show_sources),
        OutputFormat::Cli => terminal::format_answer(answer, show_sources),
    }
}

pub fn format_documents(keys: &[String], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_documents(keys),
        OutputFormat::Cli => terminal::format_documents(keys),
    }
}
