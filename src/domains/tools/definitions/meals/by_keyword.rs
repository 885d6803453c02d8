//! Meal search by menu keyword.

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

/// Parameters for the meal keyword search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MealsByKeywordParams {
    /// Text to look for in the meal description.
    #[schemars(description = "Keyword to find in the meal text (e.g. a dish name)")]
    pub keyword: String,
}

/// Meal keyword search tool.
pub struct MealsByKeywordTool;

impl MealsByKeywordTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "query_smu_meals_by_keyword";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search SMU cafeteria meals (smu_meals) whose meal text contains a keyword. Secondary to the date/category lookup.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(keyword = %params.keyword))]
    pub async fn execute(params: &MealsByKeywordParams, store: &dyn CampusStore) -> CallToolResult {
        info!("Meal keyword search: {}", params.keyword);
        match store.meals_by_keyword(&params.keyword).await {
            Ok(records) => {
                let summary =
                    found_summary(records.len(), "meal", &format!("keyword '{}'", params.keyword));
                records_result(summary, records)
            }
            Err(e) => store_error_result("query meals", &e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        store: Arc<dyn CampusStore>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: MealsByKeywordParams = parse_http_arguments(arguments)?;
        let result = Self::execute(&params, store.as_ref()).await;
        to_http_value(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<MealsByKeywordParams>().into(),
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
                let params: MealsByKeywordParams = parse_arguments(args)?;
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
    use crate::core::db::memory::StoredDate;
    use crate::domains::tools::definitions::common::test_support::*;

    #[tokio::test]
    async fn test_keyword_is_substring_match() {
        let store = InMemoryStore::new();
        store.add_meal("lunch", StoredDate::Text("2025-08-28".into()), "치즈돈까스, 샐러드");
        store.add_meal("lunch", StoredDate::Text("2025-08-27".into()), "돈까스 정식");
        store.add_meal("dinner", StoredDate::Text("2025-08-27".into()), "비빔밥");

        let params = MealsByKeywordParams {
            keyword: "돈까스".into(),
        };
        let result = MealsByKeywordTool::execute(&params, &store).await;
        let data = structured(&result);
        assert_eq!(data["count"], 2);
        // ordered by date
        assert_eq!(data["records"][0]["date"], "2025-08-27");
        assert_eq!(data["records"][1]["date"], "2025-08-28");
    }
}
