//! MCP tool definitions and handlers

use crate::protocol::*;
use docquery_core::{AnswerKind, DocQueryError, QueryRequest, RelevanceEngine, Result};
use serde_json::Value;

pub fn query_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "query".to_string(),
        description: "Answer a question with the most relevant passages from the document store"
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "Free-text question"
                }
            },
            "required": ["question"]
        }),
    }
}

pub fn documents_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "documents".to_string(),
        description: "List the document keys the engine searches".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {}
        }),
    }
}

/// Pull the question out of tool or method arguments
pub fn parse_question(args: Value) -> Result<String> {
    let request: QueryRequest = serde_json::from_value(args)
        .map_err(|e| DocQueryError::InvalidRequest(format!("Malformed arguments: {}", e)))?;

    match request.question {
        Some(q) if !q.trim().is_empty() => Ok(q),
        _ => Err(DocQueryError::InvalidRequest(
            "Question is required".to_string(),
        )),
    }
}

pub async fn handle_query(engine: &RelevanceEngine, args: Value) -> Result<ToolResult> {
    let question = parse_question(args)?;
    let answer = engine.answer(&question).await?;

    let kind = match answer.kind {
        AnswerKind::Greeting => "greeting",
        AnswerKind::Passages => "passages",
        AnswerKind::Fallback => "fallback",
    };

    Ok(ToolResult {
        content: vec![Content::Text {
            text: answer.text.clone(),
        }],
        structured_content: Some(serde_json::json!({
            "answer": answer.text,
            "kind": kind,
            "sources": answer.sources,
        })),
        is_error: None,
    })
}

pub async fn handle_documents(engine: &RelevanceEngine) -> Result<ToolResult> {
    let keys = engine.list_documents().await?;
    let summary = if keys.is_empty() {
        "No documents found".to_string()
    } else {
        format!("{} documents:\n{}", keys.len(), keys.join("\n"))
    };

    Ok(ToolResult {
        content: vec![Content::Text { text: summary }],
        structured_content: Some(serde_json::json!({ "documents": keys })),
        is_error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_question() {
        assert_eq!(
            parse_question(json!({"question": "refund policy"})).unwrap(),
            "refund policy"
        );
        assert!(matches!(
            parse_question(json!({})),
            Err(DocQueryError::InvalidRequest(_))
        ));
        assert!(parse_question(json!({"question": "  "})).is_err());
        assert!(parse_question(json!({"question": 42})).is_err());
    }

    #[test]
    fn test_tool_definitions_require_question() {
        let def = query_tool_definition();
        assert_eq!(def.name, "query");
        assert_eq!(def.input_schema["required"][0], "question");
        assert_eq!(documents_tool_definition().name, "documents");
    }
}
