//! MCP Server implementation and lifecycle management.
//!
//! The handler owns the campus store, the special-keyword table and the
//! prompt service, and delegates to them. Tool routing is built in
//! `domains/tools/router.rs`; adding a tool does not touch this file.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::db::CampusStore;
use super::error::Error;
use crate::domains::{
    prompts::PromptService,
    tools::{SpecialKeywords, build_tool_router},
};

#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, ToolRegistry};

const INSTRUCTIONS: &str = "Sangmyung University (SMU) campus data: cafeteria meals, notices, \
exam information and schedules. Call now_kr before reasoning about relative dates. Pass the \
student's user_id (학번) to schedule tools when it is known; personal schedules are only visible \
to and editable by their owner.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    config: Arc<Config>,

    prompt_service: Arc<PromptService>,

    /// Dispatch table for the HTTP transport.
    #[cfg(feature = "http")]
    registry: Arc<ToolRegistry>,

    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a server over `store`.
    ///
    /// Fails when the special-keyword override file cannot be read or parsed.
    pub fn new(config: Config, store: Arc<dyn CampusStore>) -> Result<Self, Error> {
        let config = Arc::new(config);
        let keywords = Arc::new(SpecialKeywords::load(
            config.lookups.special_keywords_path.as_deref(),
        )?);
        info!("Loaded {} special keywords", keywords.len());

        Ok(Self {
            tool_router: build_tool_router::<Self>(store.clone(), keywords.clone()),
            #[cfg(feature = "http")]
            registry: Arc::new(ToolRegistry::new(store, keywords)),
            prompt_service: Arc::new(PromptService::new()),
            config,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema,
                    "outputSchema": t.output_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        self.registry.call_tool(name, arguments).await
    }

    /// List all available prompts (for HTTP transport).
    pub async fn list_prompts(&self) -> Vec<serde_json::Value> {
        let prompts = self.prompt_service.list_prompts().await;

        prompts
            .into_iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "description": p.description,
                    "arguments": p.arguments
                })
            })
            .collect()
    }

    /// Get a prompt by name (for HTTP transport).
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, String> {
        let args = arguments.and_then(|v| {
            v.as_object().map(|obj| {
                obj.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
        });

        match self.prompt_service.get_prompt(name, args).await {
            Ok(result) => Ok(serde_json::json!({
                "description": result.description,
                "messages": result.messages
            })),
            Err(e) => Err(e.to_string()),
        }
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        let prompts = self.prompt_service.list_prompts().await;
        Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        let arguments = request.arguments.map(|map| {
            map.into_iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                .collect()
        });
        self.prompt_service
            .get_prompt(&request.name, arguments)
            .await
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::InMemoryStore;

    fn server() -> McpServer {
        McpServer::new(Config::default(), Arc::new(InMemoryStore::new())).unwrap()
    }

    #[test]
    fn test_server_info() {
        let server = server();
        assert_eq!(server.name(), "smus");
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_some());
        assert!(info.capabilities.resources.is_none());
        assert_eq!(info.server_info.name, "smus");
    }

    #[test]
    fn test_list_tools_has_schemas() {
        let tools = server().list_tools();
        assert_eq!(tools.len(), 10);
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[test]
    fn test_missing_keyword_override_fails() {
        let mut config = Config::default();
        config.lookups.special_keywords_path = Some("/nonexistent/keywords.json".into());
        let result = McpServer::new(config, Arc::new(InMemoryStore::new()));
        assert!(matches!(result, Err(Error::Tool(_))));
    }

    #[tokio::test]
    async fn test_get_prompt_over_http_shape() {
        let result = server()
            .get_prompt(
                "default_prompt",
                Some(serde_json::json!({ "message": "내일 시험 뭐 있어?" })),
            )
            .await
            .unwrap();
        assert_eq!(result["messages"].as_array().unwrap().len(), 2);
    }
}
