//! Notice board search tool.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::core::db::CampusStore;
use crate::domains::tools::definitions::common::{
    RecordList, found_summary, parse_arguments, records_result, store_error_result,
};

#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::{parse_http_arguments, to_http_value};
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// Parameters for the notice search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NoticesByKeywordParams {
    /// Text to look for in notice titles.
    #[schemars(description = "Keyword to find in the notice title")]
    pub keyword: String,
}

/// Notice search tool.
pub struct NoticesByKeywordTool;

impl NoticesByKeywordTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "query_smu_notices_by_keyword";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search SMU notices (smu_notices) whose title contains a keyword. Returns every column of the matching rows; include any URLs in the answer.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(keyword = %params.keyword))]
    pub async fn execute(params: &NoticesByKeywordParams, store: &dyn CampusStore) -> CallToolResult {
        info!("Notice search: {}", params.keyword);
        match store.notices_by_keyword(&params.keyword).await {
            Ok(records) => {
                let summary = found_summary(
                    records.len(),
                    "notice",
                    &format!("title keyword '{}'", params.keyword),
                );
                records_result(summary, records)
            }
            Err(e) => store_error_result("query notices", &e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        store: Arc<dyn CampusStore>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: NoticesByKeywordParams = parse_http_arguments(arguments)?;
        let result = Self::execute(&params, store.as_ref()).await;
        to_http_value(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<NoticesByKeywordParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<RecordList>().into()),
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO transport.
    pub fn create_route<S>(store: Arc<dyn CampusStore>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let store = store.clone();
            async move {
                let params: NoticesByKeywordParams = parse_arguments(args)?;
                Ok::<_, McpError>(Self::execute(&params, store.as_ref()).await)
            }
            .boxed()
        })
    }
}
