//! Meal lookup by date and category.
//!
//! The `date` column in `smu_meals` is not stored consistently (DATE values
//! next to `2025.08.27`-style text), so matching happens on the parsed
//! calendar date rather than on the raw column.

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

use chrono::NaiveDate;

use crate::core::db::CampusStore;
use crate::domains::tools::definitions::common::{
    RecordList, error_result, found_summary, parse_arguments, records_result, store_error_result,
};

#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::{parse_http_arguments, to_http_value};
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

fn default_category() -> String {
    "lunch".to_string()
}

/// Parameters for the meal lookup.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MealsByDateCategoryParams {
    /// ISO date such as '2025-08-27'.
    #[schemars(description = "ISO date such as '2025-08-27'")]
    pub date_iso: String,

    /// Meal category: breakfast, lunch or dinner (case-insensitive).
    #[schemars(description = "'breakfast' | 'lunch' | 'dinner' (default: lunch)")]
    #[serde(default = "default_category")]
    pub category: String,
}

/// Meal lookup tool.
pub struct MealsByDateCategoryTool;

impl MealsByDateCategoryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "query_smu_meals_by_date_category";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Look up SMU cafeteria meals (smu_meals) for a YYYY-MM-DD date and a category (breakfast/lunch/dinner). Call now_kr first when the user says 'today'.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(date = %params.date_iso, category = %params.category))]
    pub async fn execute(params: &MealsByDateCategoryParams, store: &dyn CampusStore) -> CallToolResult {
        // Compared as a calendar date; no zone conversion.
        let date = match NaiveDate::parse_from_str(params.date_iso.trim(), "%Y-%m-%d") {
            Ok(d) => d.format("%Y-%m-%d").to_string(),
            Err(_) => {
                return error_result(&format!(
                    "Invalid date: {}. Use 'YYYY-MM-DD'.",
                    params.date_iso
                ));
            }
        };
        info!("Meal lookup for {} / {}", date, params.category);

        match store.meals_by_date_category(&date, &params.category).await {
            Ok(records) => {
                let summary = found_summary(
                    records.len(),
                    "meal",
                    &format!("{} on {}", params.category.to_lowercase(), date),
                );
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
        let params: MealsByDateCategoryParams = parse_http_arguments(arguments)?;
        let result = Self::execute(&params, store.as_ref()).await;
        to_http_value(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<MealsByDateCategoryParams>().into(),
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
                let params: MealsByDateCategoryParams = parse_arguments(args)?;
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

    fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.add_meal(
            "lunch",
            StoredDate::Date(NaiveDate::from_ymd_opt(2025, 8, 27).unwrap()),
            "제육볶음",
        );
        store.add_meal("Lunch", StoredDate::Text("2025.08.27".into()), "된장찌개");
        store.add_meal("dinner", StoredDate::Text("2025.08.27".into()), "짜장면");
        store
    }

    fn params(date: &str, category: &str) -> MealsByDateCategoryParams {
        MealsByDateCategoryParams {
            date_iso: date.into(),
            category: category.into(),
        }
    }

    #[tokio::test]
    async fn test_category_case_and_date_formats() {
        let store = seeded();
        let result = MealsByDateCategoryTool::execute(&params("2025-08-27", "Lunch"), &store).await;
        assert!(!is_error(&result));

        let data = structured(&result);
        assert_eq!(data["count"], 2);
        let meals: Vec<_> = data["records"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["meal"].as_str().unwrap())
            .collect();
        assert!(meals.contains(&"제육볶음"));
        assert!(meals.contains(&"된장찌개"));
    }

    #[tokio::test]
    async fn test_no_meals_is_not_an_error() {
        let store = seeded();
        let result = MealsByDateCategoryTool::execute(&params("2025-08-28", "lunch"), &store).await;
        assert!(!is_error(&result));
        assert_eq!(structured(&result)["count"], 0);
        assert!(first_text(&result).starts_with("No meal"));
    }

    #[tokio::test]
    async fn test_invalid_date_rejected() {
        let store = seeded();
        let result = MealsByDateCategoryTool::execute(&params("27/08/2025", "lunch"), &store).await;
        assert!(is_error(&result));
        assert!(first_text(&result).contains("27/08/2025"));
    }

    #[tokio::test]
    async fn test_datetime_input_not_shifted_into_next_day() {
        let store = seeded();
        let result =
            MealsByDateCategoryTool::execute(&params("2025-08-26T20:00:00Z", "lunch"), &store)
                .await;
        assert!(is_error(&result));
        assert!(first_text(&result).contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_default_category_is_lunch() {
        let params: MealsByDateCategoryParams =
            serde_json::from_str(r#"{"date_iso": "2025-08-27"}"#).unwrap();
        assert_eq!(params.category, "lunch");
    }
}
