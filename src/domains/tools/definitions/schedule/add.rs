//! Personal schedule insertion.

use chrono::{DateTime, FixedOffset};
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

use crate::core::clock::{coerce_to_kst, now_kst, to_iso};
use crate::core::db::{CampusStore, NewSchedule, ScheduleKind};
use crate::domains::tools::definitions::common::{
    error_result, non_empty, parse_arguments, store_error_result, structured_result,
};

#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::{parse_http_arguments, to_http_value};
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// Parameters for adding a schedule.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddScheduleParams {
    /// Start of the schedule.
    #[schemars(description = "Start, e.g. '2025-10-21', '2025-10-21 13:30' or ISO-8601")]
    pub start_datetime: String,

    /// Schedule text.
    #[schemars(description = "Schedule content")]
    pub content: String,

    /// Owner student id.
    #[schemars(description = "Student id (학번) of the owner. Required")]
    pub user_id: String,

    /// End of the schedule; defaults to the start.
    #[schemars(description = "End, same formats as start. Defaults to start_datetime")]
    #[serde(default)]
    pub end_datetime: Option<String>,
}

/// Inserted schedule as reported back to the caller.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ScheduleCreated {
    pub ok: bool,
    pub id: u64,
    pub start_date_iso: String,
    pub end_date_iso: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ScheduleKind,
    pub user_id: String,
    pub created_at_iso: String,
}

/// Schedule insertion tool.
pub struct AddScheduleTool;

impl AddScheduleTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "add_smu_schedule_structured";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Insert a personal schedule into smu_schedule owned by user_id. Dates accept 'YYYY-MM-DD', 'YYYY-MM-DD HH:MM' or ISO-8601 and are stored in KST; end_datetime defaults to start_datetime and must not be earlier.";

    /// Execute the tool logic.
    pub async fn execute(params: &AddScheduleParams, store: &dyn CampusStore) -> CallToolResult {
        Self::execute_at(params, store, now_kst()).await
    }

    /// Execute with an explicit creation time.
    #[instrument(skip_all, fields(user_id = %params.user_id))]
    pub async fn execute_at(
        params: &AddScheduleParams,
        store: &dyn CampusStore,
        created_at: DateTime<FixedOffset>,
    ) -> CallToolResult {
        let start = match coerce_to_kst(&params.start_datetime) {
            Ok(dt) => dt,
            Err(e) => return error_result(&e.to_string()),
        };
        let end = match non_empty(params.end_datetime.as_deref()) {
            Some(raw) => match coerce_to_kst(raw) {
                Ok(dt) => dt,
                Err(e) => return error_result(&e.to_string()),
            },
            None => start,
        };
        if end < start {
            return error_result("end_datetime must be equal to or later than start_datetime.");
        }

        let schedule = NewSchedule {
            start,
            end,
            content: params.content.clone(),
            owner: params.user_id.clone(),
            created_at,
        };
        info!("Adding schedule '{}' at {}", schedule.content, to_iso(&start));

        match store.insert_schedule(&schedule).await {
            Ok(id) => {
                let created = ScheduleCreated {
                    ok: true,
                    id,
                    start_date_iso: to_iso(&schedule.start),
                    end_date_iso: to_iso(&schedule.end),
                    content: schedule.content,
                    kind: ScheduleKind::Personal,
                    user_id: schedule.owner,
                    created_at_iso: to_iso(&schedule.created_at),
                };
                structured_result(format!("Added schedule #{}", id), &created)
            }
            Err(e) => store_error_result("insert schedule", &e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        store: Arc<dyn CampusStore>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: AddScheduleParams = parse_http_arguments(arguments)?;
        let result = Self::execute(&params, store.as_ref()).await;
        to_http_value(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<AddScheduleParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<ScheduleCreated>().into()),
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
                let params: AddScheduleParams = parse_arguments(args)?;
                Ok::<_, McpError>(Self::execute(&params, store.as_ref()).await)
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::InMemoryStore;
    use crate::domains::tools::definitions::common::test_support::*;
    use chrono::TimeZone;

    fn params(start: &str, end: Option<&str>) -> AddScheduleParams {
        AddScheduleParams {
            start_datetime: start.into(),
            content: "Midterm".into(),
            user_id: "202012345".into(),
            end_datetime: end.map(str::to_string),
        }
    }

    fn fixed_now() -> DateTime<FixedOffset> {
        crate::core::clock::kst()
            .with_ymd_and_hms(2025, 10, 1, 12, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_date_only_start_defaults_end() {
        let store = InMemoryStore::new();
        let result = AddScheduleTool::execute_at(&params("2025-10-21", None), &store, fixed_now()).await;

        assert!(!is_error(&result));
        let data = structured(&result);
        assert_eq!(data["ok"], true);
        assert_eq!(data["start_date_iso"], "2025-10-21T00:00:00+09:00");
        assert_eq!(data["end_date_iso"], "2025-10-21T00:00:00+09:00");
        assert_eq!(data["type"], "personal");
        assert_eq!(data["user_id"], "202012345");
        assert_eq!(data["created_at_iso"], "2025-10-01T12:00:00+09:00");
        assert_eq!(store.schedule_count(), 1);
    }

    #[tokio::test]
    async fn test_utc_input_converted_to_kst() {
        let store = InMemoryStore::new();
        let result = AddScheduleTool::execute_at(
            &params("2025-10-21T00:00:00Z", Some("2025-10-21 13:30")),
            &store,
            fixed_now(),
        )
        .await;
        let data = structured(&result);
        assert_eq!(data["start_date_iso"], "2025-10-21T09:00:00+09:00");
        assert_eq!(data["end_date_iso"], "2025-10-21T13:30:00+09:00");
    }

    #[tokio::test]
    async fn test_end_before_start_rejected() {
        let store = InMemoryStore::new();
        let result = AddScheduleTool::execute_at(
            &params("2025-10-21 13:00", Some("2025-10-21 12:00")),
            &store,
            fixed_now(),
        )
        .await;
        assert!(is_error(&result));
        assert_eq!(
            first_text(&result),
            "end_datetime must be equal to or later than start_datetime."
        );
        assert_eq!(store.schedule_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_start_rejected() {
        let store = InMemoryStore::new();
        let result = AddScheduleTool::execute_at(&params("next tuesday", None), &store, fixed_now()).await;
        assert!(is_error(&result));
        assert!(first_text(&result).starts_with("Invalid datetime format: next tuesday."));
    }

    #[tokio::test]
    async fn test_unconfigured_store_refuses_write() {
        let store = InMemoryStore::read_only();
        let result = AddScheduleTool::execute_at(&params("2025-10-21", None), &store, fixed_now()).await;
        assert!(is_error(&result));
        assert_eq!(
            first_text(&result),
            "DB env vars not set: DB_HOST/DB_USER/DB_PASSWORD/DB_NAME"
        );
    }
}
