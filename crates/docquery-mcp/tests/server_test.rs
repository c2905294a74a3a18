//! Integration tests for the JSON-RPC surface

use docquery_core::{MemoryStore, RelevanceEngine, ReplyBook};
use docquery_mcp::McpServer;
use serde_json::{json, Value};
use std::sync::Arc;

const REFUND_LINE: &str =
    "Our refund policy allows returns within 30 days of purchase for any reason.";

fn engine() -> (RelevanceEngine, Arc<MemoryStore>) {
    let store = Arc::new(
        MemoryStore::new()
            .with_document("docs/policies.txt", format!("REFUNDS\n{}\n", REFUND_LINE))
            .with_document("docs/stores.txt", "Our stores open at nine every weekday morning."),
    );
    (RelevanceEngine::new(store.clone()), store)
}

async fn exchange(engine: &RelevanceEngine, requests: &[Value]) -> Vec<Value> {
    let input: String = requests
        .iter()
        .map(|r| format!("{}\n", r))
        .collect();
    let mut output: Vec<u8> = Vec::new();

    McpServer::new(engine)
        .serve(input.as_bytes(), &mut output)
        .await
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[tokio::test]
async fn test_initialize_and_tools_list() {
    let (engine, _) = engine();
    let responses = exchange(
        &engine,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "docquery");
    let names: Vec<&str> = responses[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["query", "documents"]);
}

#[tokio::test]
async fn test_query_method_returns_answer_object() {
    let (engine, _) = engine();
    let responses = exchange(
        &engine,
        &[json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "query",
            "params": {"question": "What is the refund policy?"}
        })],
    )
    .await;

    assert_eq!(responses[0]["result"], json!({ "answer": REFUND_LINE }));
}

#[tokio::test]
async fn test_query_tool_reports_kind_and_sources() {
    let (engine, store) = engine();
    let responses = exchange(
        &engine,
        &[
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "query", "arguments": {"question": "hello"}}
            }),
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/call",
                "params": {"name": "query", "arguments": {"question": "refund policy"}}
            }),
        ],
    )
    .await;

    let greeting = &responses[0]["result"]["structuredContent"];
    assert_eq!(greeting["kind"], "greeting");
    assert_eq!(
        greeting["answer"].as_str(),
        ReplyBook::default().greeting("hello")
    );

    let passages = &responses[1]["result"]["structuredContent"];
    assert_eq!(passages["kind"], "passages");
    assert_eq!(passages["sources"], json!(["docs/policies.txt"]));
    assert_eq!(responses[1]["result"]["content"][0]["text"], REFUND_LINE);

    // only the second question reached the store
    assert_eq!(store.list_count(), 1);
}

#[tokio::test]
async fn test_missing_question_is_a_400_class_error() {
    let (engine, store) = engine();
    let responses = exchange(
        &engine,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "query", "params": {}}),
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/call",
                "params": {"name": "query", "arguments": {"question": ""}}
            }),
        ],
    )
    .await;

    for response in &responses {
        assert_eq!(response["error"]["code"], -32602);
        assert_eq!(response["error"]["data"]["status"], 400);
    }
    assert_eq!(store.list_count(), 0);
}

#[tokio::test]
async fn test_parse_errors_and_unknown_methods() {
    let (engine, _) = engine();
    let mut output: Vec<u8> = Vec::new();
    let input = "not json\n{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"prompts/list\"}\n";

    McpServer::new(&engine)
        .serve(input.as_bytes(), &mut output)
        .await
        .unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[1]["error"]["code"], -32601);
}

#[tokio::test]
async fn test_documents_and_resources() {
    let (engine, _) = engine();
    let responses = exchange(
        &engine,
        &[
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "documents", "arguments": {}}
            }),
            json!({"jsonrpc": "2.0", "id": 2, "method": "resources/list"}),
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "resources/read",
                "params": {"uri": "docquery://docs/stores.txt"}
            }),
        ],
    )
    .await;

    assert_eq!(
        responses[0]["result"]["structuredContent"]["documents"],
        json!(["docs/policies.txt", "docs/stores.txt"])
    );
    assert_eq!(
        responses[1]["result"]["resources"][1]["uri"],
        "docquery://docs/stores.txt"
    );
    assert_eq!(
        responses[2]["result"]["contents"][0]["text"],
        "Our stores open at nine every weekday morning."
    );
}

#[tokio::test]
async fn test_resources_read_refuses_keys_outside_scope() {
    let store = Arc::new(
        MemoryStore::new()
            .with_document("docs/faq.txt", "Frequently asked questions")
            .with_document("docs/logo.png", "binary")
            .with_document("private/keys.env", "AWS_SECRET_ACCESS_KEY=topsecret"),
    );
    let engine = RelevanceEngine::new(store.clone()).with_prefix("docs/");

    let responses = exchange(
        &engine,
        &[
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "resources/read",
                "params": {"uri": "docquery://private/keys.env"}
            }),
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "resources/read",
                "params": {"uri": "docquery://docs/logo.png"}
            }),
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "resources/read",
                "params": {"uri": "docquery://docs/faq.txt"}
            }),
        ],
    )
    .await;

    for response in &responses[..2] {
        assert_eq!(response["error"]["code"], -32602);
        assert!(response.get("result").is_none());
    }
    assert_eq!(
        responses[2]["result"]["contents"][0]["text"],
        "Frequently asked questions"
    );
    assert_eq!(store.fetch_count(), 1);
}
