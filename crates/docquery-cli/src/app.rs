//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docquery")]
#[command(
    author,
    version,
    about = "Answer questions from the documents in a bucket"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "DOCQUERY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read documents from a local directory instead of S3
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// S3 bucket holding the documents
    #[arg(long, global = true)]
    pub bucket: Option<String>,

    /// Only consider keys under this prefix
    #[arg(long, global = true)]
    pub prefix: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a question
    Ask(AskArgs),

    /// List searchable documents
    Ls,

    /// Inspect or create the config file
    Config(ConfigArgs),

    /// Start MCP server on stdio
    Mcp,
}

#[derive(Args)]
pub struct AskArgs {
    /// Question text
    pub question: Vec<String>,

    /// Print the documents the answer came from
    #[arg(long)]
    pub sources: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Cli,
    Json,
}
