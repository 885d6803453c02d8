//! Current KST time tool.
//!
//! Agents call this before answering anything relative to "today".

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::core::clock::ClockSnapshot;
use crate::domains::tools::definitions::common::{parse_arguments, structured_result};

#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::to_http_value;
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// The tool takes no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NowKrParams {}

/// Current-time tool.
pub struct NowKrTool;

impl NowKrTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "now_kr";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Return current date/time info in Asia/Seoul (KST, UTC+9): ISO timestamp, date, time, weekday and timezone label.";

    /// Execute the tool logic.
    pub fn execute(_params: &NowKrParams) -> CallToolResult {
        let snapshot = ClockSnapshot::now();
        info!("now_kr: {}", snapshot.iso);
        let summary = format!(
            "Now in Asia/Seoul: {} {} ({})",
            snapshot.date, snapshot.time, snapshot.weekday
        );
        structured_result(summary, &snapshot)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(_arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let result = Self::execute(&NowKrParams::default());
        to_http_value(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<NowKrParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<ClockSnapshot>().into()),
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO transport.
    pub fn create_route<S>() -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            async move {
                let params: NowKrParams = parse_arguments(args)?;
                Ok::<_, McpError>(Self::execute(&params))
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::TIMEZONE_LABEL;
    use crate::domains::tools::definitions::common::test_support::*;

    #[test]
    fn test_now_kr_fields() {
        let result = NowKrTool::execute(&NowKrParams::default());
        assert!(!is_error(&result));

        let data = structured(&result);
        assert_eq!(data["tz"], TIMEZONE_LABEL);
        assert!(data["iso"].as_str().unwrap().contains("+09:00"));
        assert_eq!(data["date"].as_str().unwrap().len(), 10);
        assert_eq!(data["time"].as_str().unwrap().len(), 8);
        assert!(first_text(&result).starts_with("Now in Asia/Seoul"));
    }

    #[test]
    fn test_params_accept_empty_object() {
        let params: Result<NowKrParams, _> = serde_json::from_str("{}");
        assert!(params.is_ok());
    }
}
