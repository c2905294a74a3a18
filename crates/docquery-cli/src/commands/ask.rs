//! Ask command

use crate::app::{AskArgs, OutputFormat};
use crate::output;
use anyhow::Result;
use docquery_core::{Config, RelevanceEngine};

pub async fn run(args: AskArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let question = args.question.join(" ");
    let engine = RelevanceEngine::from_config(config)?;
    let answer = engine.answer(&question).await?;

    print!("{}", output::format_answer(&answer, format, args.sources));
    Ok(())
}
