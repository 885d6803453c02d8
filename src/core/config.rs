//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (and a `.env` file) or defaults.
//! It is built once by the entry point and handed to everything that needs it.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Canned-response lookup configuration.
    pub lookups: LookupsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Database connection configuration.
    pub database: DatabaseConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the special-keyword lookup table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupsConfig {
    /// JSON file replacing the built-in keyword table, if set.
    pub special_keywords_path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// MySQL connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    /// Database (schema) name.
    pub name: String,
    pub port: u16,

    /// Upper bound on pooled connections.
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection before failing.
    pub acquire_timeout_secs: u64,

    /// True only when host, user, password and name were all set in the
    /// environment. Writes are refused otherwise.
    pub credentials_from_env: bool,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("port", &self.port)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("credentials_from_env", &self.credentials_from_env)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            user: "root".to_string(),
            password: String::new(),
            name: "smu".to_string(),
            port: 3306,
            max_connections: 5,
            acquire_timeout_secs: 30,
            credentials_from_env: false,
        }
    }
}

impl DatabaseConfig {
    /// Read `DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_PORT` and the
    /// pool knobs, falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let host = std::env::var("DB_HOST").ok();
        let user = std::env::var("DB_USER").ok();
        let password = std::env::var("DB_PASSWORD").ok();
        let name = std::env::var("DB_NAME").ok();

        config.credentials_from_env = [&host, &user, &password, &name]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.is_empty()));

        if let Some(host) = host {
            config.host = host;
        }
        if let Some(user) = user {
            config.user = user;
        }
        if let Some(password) = password {
            config.password = password;
        }
        if let Some(name) = name {
            config.name = name;
        }

        if let Some(port) = parse_env("DB_PORT") {
            config.port = port;
        }
        if let Some(max) = parse_env("DB_MAX_CONNECTIONS") {
            config.max_connections = max;
        }
        if let Some(secs) = parse_env("DB_ACQUIRE_TIMEOUT_SECS") {
            config.acquire_timeout_secs = secs;
        }

        if !config.credentials_from_env {
            warn!(
                "DB_HOST/DB_USER/DB_PASSWORD/DB_NAME not all set - \
                 reads use defaults, schedule writes are disabled"
            );
        }

        config
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "smus".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            lookups: LookupsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings are prefixed with `MCP_` (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`); database settings use the `DB_` prefix.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(path) = std::env::var("MCP_SPECIAL_KEYWORDS_PATH") {
            info!("Special keywords will be loaded from {}", path);
            config.lookups.special_keywords_path = Some(PathBuf::from(path));
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config.database = DatabaseConfig::from_env();

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    const DB_VARS: [&str; 5] = ["DB_HOST", "DB_USER", "DB_PASSWORD", "DB_NAME", "DB_PORT"];

    fn clear_db_vars() {
        for key in DB_VARS {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_database_defaults_disable_writes() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_db_vars();

        let db = DatabaseConfig::from_env();
        assert_eq!(db.port, 3306);
        assert_eq!(db.host, "localhost");
        assert!(!db.credentials_from_env);
    }

    #[test]
    fn test_database_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("DB_HOST", "db.internal");
            std::env::set_var("DB_USER", "smu");
            std::env::set_var("DB_PASSWORD", "hunter2");
            std::env::set_var("DB_NAME", "campus");
            std::env::set_var("DB_PORT", "3307");
        }

        let db = DatabaseConfig::from_env();
        assert_eq!(db.host, "db.internal");
        assert_eq!(db.name, "campus");
        assert_eq!(db.port, 3307);
        assert!(db.credentials_from_env);

        clear_db_vars();
    }

    #[test]
    fn test_partial_credentials_keep_writes_disabled() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_db_vars();
        unsafe {
            std::env::set_var("DB_HOST", "db.internal");
            std::env::set_var("DB_PORT", "not-a-port");
        }

        let db = DatabaseConfig::from_env();
        assert_eq!(db.host, "db.internal");
        assert_eq!(db.port, 3306);
        assert!(!db.credentials_from_env);

        clear_db_vars();
    }

    #[test]
    fn test_password_redacted_in_debug() {
        let db = DatabaseConfig {
            password: "super_secret_password".to_string(),
            ..DatabaseConfig::default()
        };
        let debug_str = format!("{:?}", db);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_password"));
    }

    #[test]
    fn test_config_default_server_name() {
        let config = Config::default();
        assert_eq!(config.server.name, "smus");
        assert!(config.lookups.special_keywords_path.is_none());
    }
}
