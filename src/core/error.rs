//! Unified error type for server setup.
//!
//! Request-time failures are reported to clients by each layer's own
//! `thiserror` enum; this one only covers building the server.

use thiserror::Error;

/// Error raised while constructing the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// The special-keyword table could not be loaded.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolError;

    #[test]
    fn test_wraps_tool_errors() {
        let err: Error = ToolError::internal("bad keyword table").into();
        assert_eq!(err.to_string(), "Tool error: Internal error: bad keyword table");
    }
}
