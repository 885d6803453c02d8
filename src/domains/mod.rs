//! What the server exposes to MCP clients.

pub mod prompts;
pub mod tools;
