//! Transport layer for the MCP server.
//!
//! - **HTTP**: JSON-RPC over POST with CORS (default) - feature: `http`
//! - **STDIO**: standard input/output - feature: `stdio`
//!
//! `MCP_TRANSPORT` picks one at startup; both hand requests to the same
//! [`McpServer`](crate::core::McpServer).

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
