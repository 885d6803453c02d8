//! Tool Router - builds the rmcp ToolRouter for the STDIO transport.
//!
//! Each tool creates its own route; this module only wires in the shared
//! store and keyword table.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::core::db::CampusStore;

use super::definitions::{
    AddScheduleTool, DeleteScheduleTool, ExamSearchTool, MealsByDateCategoryTool,
    MealsByKeywordTool, NoticesByKeywordTool, NowKrTool, ScheduleByDateTool,
    ScheduleByKeywordTool, SpecialKeywords, SpecialKeywordsTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(
    store: Arc<dyn CampusStore>,
    keywords: Arc<SpecialKeywords>,
) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(NowKrTool::create_route())
        .with_route(MealsByDateCategoryTool::create_route(store.clone()))
        .with_route(MealsByKeywordTool::create_route(store.clone()))
        .with_route(NoticesByKeywordTool::create_route(store.clone()))
        .with_route(ExamSearchTool::create_route(store.clone()))
        .with_route(ScheduleByKeywordTool::create_route(store.clone()))
        .with_route(ScheduleByDateTool::create_route(store.clone()))
        .with_route(SpecialKeywordsTool::create_route(keywords))
        .with_route(AddScheduleTool::create_route(store.clone()))
        .with_route(DeleteScheduleTool::create_route(store))
}
