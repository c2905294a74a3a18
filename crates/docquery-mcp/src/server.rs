//! MCP server implementation

use crate::protocol::*;
use crate::resources;
use crate::tools;
use anyhow::Result;
use docquery_core::RelevanceEngine;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

pub struct McpServer<'a> {
    engine: &'a RelevanceEngine,
}

impl<'a> McpServer<'a> {
    pub fn new(engine: &'a RelevanceEngine) -> Self {
        Self { engine }
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout
    pub async fn run(&self) -> Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = BufWriter::new(tokio::io::stdout());
        self.serve(reader, writer).await
    }

    /// Serve until `reader` reaches end of input
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(trimmed) {
                Ok(r) => r,
                Err(e) => {
                    let response = JsonRpcResponse::error(
                        None,
                        error_codes::PARSE_ERROR,
                        &format!("Parse error: {}", e),
                    );
                    self.write_response(&mut writer, &response).await?;
                    continue;
                }
            };

            // Notifications get no reply
            if request.id.is_none() && request.method.starts_with("notifications/") {
                continue;
            }

            let response = self.handle_request(&request).await;
            self.write_response(&mut writer, &response).await?;
        }

        Ok(())
    }

    async fn write_response<W: AsyncWrite + Unpin>(
        &self,
        writer: &mut W,
        response: &JsonRpcResponse,
    ) -> Result<()> {
        let json = serde_json::to_string(response)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    pub async fn handle_request(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            "resources/list" => self.handle_resources_list(request).await,
            "resources/read" => self.handle_resources_read(request).await,
            "query" => self.handle_query(request).await,
            _ => JsonRpcResponse::error(
                request.id.clone(),
                error_codes::METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let result = serde_json::json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {},
                "resources": { "subscribe": false }
            },
            "serverInfo": {
                "name": "docquery",
                "version": env!("CARGO_PKG_VERSION")
            }
        });
        JsonRpcResponse::success(request.id.clone(), result)
    }

    fn handle_tools_list(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let tools = vec![
            tools::query_tool_definition(),
            tools::documents_tool_definition(),
        ];

        JsonRpcResponse::success(request.id.clone(), serde_json::json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let name = request
            .params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        let arguments = request
            .params
            .get("arguments")
            .cloned()
            .unwrap_or(serde_json::json!({}));

        let result = match name {
            "query" => tools::handle_query(self.engine, arguments).await,
            "documents" => tools::handle_documents(self.engine).await,
            _ => {
                return JsonRpcResponse::error(
                    request.id.clone(),
                    error_codes::INVALID_PARAMS,
                    &format!("Unknown tool: {}", name),
                )
            }
        };

        match result.and_then(|r| serde_json::to_value(r).map_err(Into::into)) {
            Ok(value) => JsonRpcResponse::success(request.id.clone(), value),
            Err(e) => {
                tracing::warn!("Tool {} failed: {}", name, e);
                JsonRpcResponse::from_engine_error(request.id.clone(), &e)
            }
        }
    }

    /// Plain query method: `{question}` in, `{answer}` out
    async fn handle_query(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let outcome = match tools::parse_question(request.params.clone()) {
            Ok(question) => self.engine.answer(&question).await,
            Err(e) => Err(e),
        };

        match outcome.and_then(|a| serde_json::to_value(a.to_response()).map_err(Into::into)) {
            Ok(value) => JsonRpcResponse::success(request.id.clone(), value),
            Err(e) => {
                tracing::warn!("Query failed: {}", e);
                JsonRpcResponse::from_engine_error(request.id.clone(), &e)
            }
        }
    }

    async fn handle_resources_list(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        match resources::list_resources(self.engine).await {
            Ok(value) => JsonRpcResponse::success(request.id.clone(), value),
            Err(e) => JsonRpcResponse::error(
                request.id.clone(),
                error_codes::INTERNAL_ERROR,
                &e.to_string(),
            ),
        }
    }

    async fn handle_resources_read(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let uri = request
            .params
            .get("uri")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        match resources::read_resource(self.engine, uri).await {
            Ok(content) => JsonRpcResponse::success(
                request.id.clone(),
                serde_json::json!({ "contents": [content] }),
            ),
            Err(e) => JsonRpcResponse::error(
                request.id.clone(),
                error_codes::INVALID_PARAMS,
                &e.to_string(),
            ),
        }
    }
}

pub async fn start_server(engine: &RelevanceEngine) -> Result<()> {
    let server = McpServer::new(engine);
    server.run().await
}
