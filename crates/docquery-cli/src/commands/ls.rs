//! Ls command

use crate::app::OutputFormat;
use crate::output;
use anyhow::Result;
use docquery_core::{Config, RelevanceEngine};

pub async fn run(config: &Config, format: OutputFormat) -> Result<()> {
    let engine = RelevanceEngine::from_config(config)?;
    let keys = engine.list_documents().await?;

    print!("{}", output::format_documents(&keys, format));
    Ok(())
}
