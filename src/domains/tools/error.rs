//! Tool-specific error types.

use thiserror::Error;

/// Errors raised around tool dispatch and setup.
///
/// Failures inside a tool call are reported to the client as error results,
/// not through this type.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ToolError::not_found("query_smu_bus").to_string(),
            "Tool not found: query_smu_bus"
        );
        assert_eq!(
            ToolError::invalid_arguments("missing field `keyword`").to_string(),
            "Invalid arguments: missing field `keyword`"
        );
    }
}
