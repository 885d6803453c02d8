//! Exam information search tool.

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

/// Parameters for the exam search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExamSearchParams {
    /// Text to look for in the subject name.
    #[schemars(description = "Keyword to find in the subject name")]
    pub keyword: String,

    /// Optional text to look for in the professor name.
    #[schemars(description = "Optional professor name filter, combined with the subject keyword")]
    #[serde(default)]
    pub professor: Option<String>,
}

/// Exam search tool.
pub struct ExamSearchTool;

impl ExamSearchTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "query_smu_exam";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search SMU exam information (smu_exam) by subject name, optionally narrowed by professor. Results are ordered by subject name.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(keyword = %params.keyword))]
    pub async fn execute(params: &ExamSearchParams, store: &dyn CampusStore) -> CallToolResult {
        let professor = non_empty(params.professor.as_deref());
        info!(
            "Exam search: subject '{}', professor {:?}",
            params.keyword, professor
        );

        match store.exams(&params.keyword, professor).await {
            Ok(records) => {
                let criteria = match professor {
                    Some(p) => format!("subject '{}' and professor '{}'", params.keyword, p),
                    None => format!("subject '{}'", params.keyword),
                };
                records_result(found_summary(records.len(), "exam", &criteria), records)
            }
            Err(e) => store_error_result("query exams", &e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        store: Arc<dyn CampusStore>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: ExamSearchParams = parse_http_arguments(arguments)?;
        let result = Self::execute(&params, store.as_ref()).await;
        to_http_value(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<ExamSearchParams>().into(),
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
                let params: ExamSearchParams = parse_arguments(args)?;
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

    fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.add_exam(Some("운영체제"), Some("박교수"));
        store.add_exam(Some("데이터베이스"), Some("이교수"));
        store.add_exam(Some("데이터구조"), Some("박교수"));
        store.add_exam(Some("데이터마이닝"), None);
        store
    }

    #[tokio::test]
    async fn test_subject_only_sorted() {
        let store = seeded();
        let params = ExamSearchParams {
            keyword: "데이터".into(),
            professor: None,
        };
        let data = structured(&ExamSearchTool::execute(&params, &store).await);
        assert_eq!(data["count"], 3);
        let subjects: Vec<_> = data["records"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["subject_name"].as_str().unwrap().to_string())
            .collect();
        let mut sorted = subjects.clone();
        sorted.sort();
        assert_eq!(subjects, sorted);
    }

    #[tokio::test]
    async fn test_professor_filter_is_and() {
        let store = seeded();
        let params = ExamSearchParams {
            keyword: "데이터".into(),
            professor: Some("박".into()),
        };
        let data = structured(&ExamSearchTool::execute(&params, &store).await);
        assert_eq!(data["count"], 1);
        assert_eq!(data["records"][0]["subject_name"], "데이터구조");
    }

    #[tokio::test]
    async fn test_empty_professor_ignored() {
        let store = seeded();
        let params = ExamSearchParams {
            keyword: "데이터".into(),
            professor: Some(String::new()),
        };
        let data = structured(&ExamSearchTool::execute(&params, &store).await);
        assert_eq!(data["count"], 3);
    }
}
