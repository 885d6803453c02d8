//! SMU campus MCP server.
//!
//! Exposes Sangmyung University data (cafeteria meals, notices, exam
//! information, schedules) stored in MySQL as Model Context Protocol tools,
//! together with a date-anchored `default_prompt`.
//!
//! # Architecture
//!
//! - **core**: configuration, the fixed KST clock, the `CampusStore` data
//!   layer, errors, the MCP server handler and its HTTP/STDIO transports
//! - **domains**: what the server exposes
//!   - **tools**: one file per tool, grouped by table
//!   - **prompts**: data-file prompt templates
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use smus_mcp_server::core::{Config, McpServer, TransportService, db::MySqlStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let store = Arc::new(MySqlStore::connect_lazy(&config.database));
//!     let transport = TransportService::new(config.transport.clone());
//!     transport.run(McpServer::new(config, store)?).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer};
