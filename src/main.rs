//! SMU campus MCP server entry point.
//!
//! Loads configuration from the environment (and `.env`), initializes
//! logging, builds the MySQL-backed store and runs the configured transport.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use smus_mcp_server::core::config::LoggingConfig;
use smus_mcp_server::core::db::MySqlStore;
use smus_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(&config.logging);

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!(
        "Database {}@{}:{}/{}",
        config.database.user, config.database.host, config.database.port, config.database.name
    );

    // No connection is opened until the first tool call.
    let store = Arc::new(MySqlStore::connect_lazy(&config.database));

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config, store).context("Failed to initialize server")?;

    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` directives are honoured; the configured level is added on top.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
