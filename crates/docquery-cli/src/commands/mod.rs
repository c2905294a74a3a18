pub mod ask;
pub mod config;
pub mod ls;
pub mod mcp;
