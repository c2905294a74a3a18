use anyhow::Result;
use docquery_core::{Config, RelevanceEngine};

pub async fn run(config: &Config) -> Result<()> {
    let engine = RelevanceEngine::from_config(config)?;
    tracing::info!("Starting MCP server ({} store)", engine.store().store_type());
    docquery_mcp::start_server(&engine).await
}
