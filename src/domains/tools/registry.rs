//! Tool Registry - HTTP dispatch for all tools.
//!
//! The STDIO transport routes through `router.rs`; both must list the same tools.

use std::sync::Arc;
use tracing::warn;

use crate::core::db::CampusStore;

use super::definitions::{
    AddScheduleTool, DeleteScheduleTool, ExamSearchTool, MealsByDateCategoryTool,
    MealsByKeywordTool, NoticesByKeywordTool, NowKrTool, ScheduleByDateTool,
    ScheduleByKeywordTool, SpecialKeywords, SpecialKeywordsTool,
};
use super::error::ToolError;

/// Tool registry holding the dependencies tool calls need.
pub struct ToolRegistry {
    store: Arc<dyn CampusStore>,
    keywords: Arc<SpecialKeywords>,
}

impl ToolRegistry {
    pub fn new(store: Arc<dyn CampusStore>, keywords: Arc<SpecialKeywords>) -> Self {
        Self { store, keywords }
    }

    /// Dispatch an HTTP tool call to the matching handler.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let store = self.store.clone();
        match name {
            NowKrTool::NAME => NowKrTool::http_handler(arguments),
            MealsByDateCategoryTool::NAME => {
                MealsByDateCategoryTool::http_handler(arguments, store).await
            }
            MealsByKeywordTool::NAME => MealsByKeywordTool::http_handler(arguments, store).await,
            NoticesByKeywordTool::NAME => {
                NoticesByKeywordTool::http_handler(arguments, store).await
            }
            ExamSearchTool::NAME => ExamSearchTool::http_handler(arguments, store).await,
            ScheduleByKeywordTool::NAME => {
                ScheduleByKeywordTool::http_handler(arguments, store).await
            }
            ScheduleByDateTool::NAME => ScheduleByDateTool::http_handler(arguments, store).await,
            SpecialKeywordsTool::NAME => SpecialKeywordsTool::http_handler(arguments, &self.keywords),
            AddScheduleTool::NAME => AddScheduleTool::http_handler(arguments, store).await,
            DeleteScheduleTool::NAME => DeleteScheduleTool::http_handler(arguments, store).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}
