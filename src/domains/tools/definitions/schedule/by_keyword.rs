//! Schedule search by content keyword.

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
    RecordList, found_summary, non_empty, parse_arguments, records_result, store_error_result,
};

#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::{parse_http_arguments, to_http_value};
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// Parameters for the schedule keyword search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ScheduleByKeywordParams {
    /// Text to look for in schedule content.
    #[schemars(description = "Keyword to find in the schedule content")]
    pub keyword: String,

    /// Student id of the caller; includes their personal schedules.
    #[schemars(
        description = "Student id (학번). When given, personal schedules of this user are included next to common ones"
    )]
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Schedule keyword search tool.
pub struct ScheduleByKeywordTool;

impl ScheduleByKeywordTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "query_smu_schedule_by_keyword";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search SMU schedules (smu_schedule) whose content contains a keyword. Common schedules are always visible; personal schedules only when the owner's user_id is given. Ordered by start date.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(keyword = %params.keyword))]
    pub async fn execute(params: &ScheduleByKeywordParams, store: &dyn CampusStore) -> CallToolResult {
        let viewer = non_empty(params.user_id.as_deref());
        info!("Schedule search: '{}' (user: {:?})", params.keyword, viewer);

        match store.schedules_by_keyword(&params.keyword, viewer).await {
            Ok(records) => {
                let summary = found_summary(
                    records.len(),
                    "schedule",
                    &format!("content keyword '{}'", params.keyword),
                );
                records_result(summary, records)
            }
            Err(e) => store_error_result("query schedules", &e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        store: Arc<dyn CampusStore>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: ScheduleByKeywordParams = parse_http_arguments(arguments)?;
        let result = Self::execute(&params, store.as_ref()).await;
        to_http_value(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<ScheduleByKeywordParams>().into(),
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
                let params: ScheduleByKeywordParams = parse_arguments(args)?;
                Ok::<_, McpError>(Self::execute(&params, store.as_ref()).await)
            }
            .boxed()
        })
    }
}
