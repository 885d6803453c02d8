//! Core module containing shared infrastructure components.
//!
//! Configuration, the fixed-zone clock, database access, error handling,
//! the MCP server handler and the transports it runs on.

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::Error;
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
