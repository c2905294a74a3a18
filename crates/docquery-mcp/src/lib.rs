//! Docquery MCP Server
//!
//! Model Context Protocol server exposing the question answering engine to
//! chat front ends and AI assistants.

pub mod protocol;
mod resources;
mod server;
pub mod tools;

pub use server::{start_server, McpServer};
