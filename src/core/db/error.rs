//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing campus data.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writes need explicit credentials; none were configured.
    #[error("DB env vars not set: DB_HOST/DB_USER/DB_PASSWORD/DB_NAME")]
    MissingConfig,

    /// The database rejected or failed a statement.
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether this error was raised before any connection was attempted.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::MissingConfig)
    }
}
