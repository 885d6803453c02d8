//! Personal schedule deletion by content keyword.
//!
//! Only `personal` rows owned by the caller are ever touched; common
//! schedules and other users' rows survive any keyword.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::core::db::{CampusStore, DeletedSchedule};
use crate::domains::tools::definitions::common::{
    parse_arguments, store_error_result, structured_result,
};

#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::{parse_http_arguments, to_http_value};
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// How many deleted contents are named in the message.
const PREVIEW_LIMIT: usize = 3;

/// Parameters for deleting schedules.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteScheduleParams {
    /// Text contained in the schedules to delete.
    #[schemars(description = "Keyword contained in the content of the schedules to delete")]
    pub content_keyword: String,

    /// Owner student id.
    #[schemars(description = "Student id (학번). Only this user's personal schedules are deleted")]
    pub user_id: String,
}

/// Outcome of a delete.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ScheduleDeletion {
    pub ok: bool,
    pub deleted_count: usize,
    pub deleted_ids: Vec<i64>,
    pub message: String,
}

impl ScheduleDeletion {
    fn from_deleted(deleted: &[DeletedSchedule], params: &DeleteScheduleParams) -> Self {
        if deleted.is_empty() {
            return Self {
                ok: false,
                deleted_count: 0,
                deleted_ids: Vec::new(),
                message: format!(
                    "No personal schedules found with keyword: {} for user_id: {}",
                    params.content_keyword, params.user_id
                ),
            };
        }

        let preview: Vec<&str> = deleted
            .iter()
            .take(PREVIEW_LIMIT)
            .map(|row| row.content.as_str())
            .collect();
        let ellipsis = if deleted.len() > PREVIEW_LIMIT { "..." } else { "" };

        Self {
            ok: true,
            deleted_count: deleted.len(),
            deleted_ids: deleted.iter().map(|row| row.id).collect(),
            message: format!(
                "Successfully deleted {} personal schedules: {}{}",
                deleted.len(),
                preview.join(", "),
                ellipsis
            ),
        }
    }
}

/// Schedule deletion tool.
pub struct DeleteScheduleTool;

impl DeleteScheduleTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "delete_smu_schedule_by_content";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Delete the personal schedules of user_id whose content contains a keyword. Common schedules and other users' schedules are never deleted. Returns ok=false when nothing matched.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(keyword = %params.content_keyword, user_id = %params.user_id))]
    pub async fn execute(params: &DeleteScheduleParams, store: &dyn CampusStore) -> CallToolResult {
        match store
            .delete_personal_schedules(&params.content_keyword, &params.user_id)
            .await
        {
            Ok(deleted) => {
                let outcome = ScheduleDeletion::from_deleted(&deleted, params);
                info!("{}", outcome.message);
                structured_result(outcome.message.clone(), &outcome)
            }
            Err(e) => store_error_result("delete schedules", &e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        store: Arc<dyn CampusStore>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: DeleteScheduleParams = parse_http_arguments(arguments)?;
        let result = Self::execute(&params, store.as_ref()).await;
        to_http_value(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<DeleteScheduleParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<ScheduleDeletion>().into()),
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
                let params: DeleteScheduleParams = parse_arguments(args)?;
                Ok::<_, McpError>(Self::execute(&params, store.as_ref()).await)
            }
            .boxed()
        })
    }
}
