//! Canned responses for a fixed set of keywords.
//!
//! The table ships embedded in the binary and can be replaced at startup
//! with a JSON object file (`MCP_SPECIAL_KEYWORDS_PATH`).

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    error_result, parse_arguments, structured_result,
};

#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::{parse_http_arguments, to_http_value};

const EMBEDDED_KEYWORDS: &str = include_str!("../../../../../data/special_keywords.json");

/// Keyword to response table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SpecialKeywords(BTreeMap<String, String>);

impl SpecialKeywords {
    /// The table compiled into the binary.
    pub fn embedded() -> Result<Self, ToolError> {
        Self::from_json(EMBEDDED_KEYWORDS)
    }

    /// Parse a JSON object of `keyword: response` pairs.
    pub fn from_json(json: &str) -> Result<Self, ToolError> {
        serde_json::from_str(json)
            .map_err(|e| ToolError::internal(format!("Invalid special keywords table: {}", e)))
    }

    /// Load from `path` when given, otherwise use the embedded table.
    pub fn load(path: Option<&Path>) -> Result<Self, ToolError> {
        match path {
            Some(path) => {
                debug!("Loading special keywords from {}", path.display());
                let json = std::fs::read_to_string(path).map_err(|e| {
                    ToolError::internal(format!(
                        "Failed to read special keywords from {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Self::from_json(&json)
            }
            None => Self::embedded(),
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.0.get(keyword).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parameters for the keyword lookup.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SpecialKeywordsParams {
    #[schemars(description = "Keyword to look up")]
    pub keyword: String,
}

/// Lookup result.
#[derive(Debug, Serialize, JsonSchema)]
pub struct SpecialKeywordAnswer {
    pub keyword: String,
    pub response: String,
}

/// Special keyword lookup tool.
pub struct SpecialKeywordsTool;

impl SpecialKeywordsTool {
    pub const NAME: &'static str = "query_special_keywords";

    pub const DESCRIPTION: &'static str =
        "Return the predefined response for a special keyword. Unknown keywords are an error.";

    #[instrument(skip_all, fields(keyword = %params.keyword))]
    pub fn execute(params: &SpecialKeywordsParams, keywords: &SpecialKeywords) -> CallToolResult {
        match keywords.get(&params.keyword) {
            Some(response) => {
                info!("Special keyword hit");
                let answer = SpecialKeywordAnswer {
                    keyword: params.keyword.clone(),
                    response: response.to_string(),
                };
                structured_result(answer.response.clone(), &answer)
            }
            None => error_result(&format!("Unknown special keyword: {}", params.keyword)),
        }
    }

    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: serde_json::Value,
        keywords: &SpecialKeywords,
    ) -> Result<serde_json::Value, ToolError> {
        let params: SpecialKeywordsParams = parse_http_arguments(arguments)?;
        to_http_value(&Self::execute(&params, keywords))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<SpecialKeywordsParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<SpecialKeywordAnswer>().into()),
            icons: None,
            meta: None,
            title: None,
        }
    }

    pub fn create_route<S>(keywords: Arc<SpecialKeywords>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let keywords = keywords.clone();
            async move {
                let params: SpecialKeywordsParams = parse_arguments(args)?;
                Ok::<_, McpError>(Self::execute(&params, &keywords))
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::test_support::*;
    use std::io::Write;

    #[test]
    fn test_embedded_table() {
        let keywords = SpecialKeywords::embedded().unwrap();
        assert_eq!(keywords.len(), 5);
        assert_eq!(keywords.get("김정찬"), Some("해적왕이 될 사람이다."));
    }

    #[test]
    fn test_known_keyword() {
        let keywords = SpecialKeywords::embedded().unwrap();
        let params = SpecialKeywordsParams {
            keyword: "김진석".into(),
        };
        let result = SpecialKeywordsTool::execute(&params, &keywords);
        assert!(!is_error(&result));
        assert_eq!(first_text(&result), "군인이 될 사람이다.");
        assert_eq!(structured(&result)["keyword"], "김진석");
    }

    #[test]
    fn test_unknown_keyword() {
        let keywords = SpecialKeywords::embedded().unwrap();
        let params = SpecialKeywordsParams {
            keyword: "홍길동".into(),
        };
        let result = SpecialKeywordsTool::execute(&params, &keywords);
        assert!(is_error(&result));
        assert_eq!(first_text(&result), "Unknown special keyword: 홍길동");
    }

    #[test]
    fn test_load_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"campus": "Seoul and Cheonan"}}"#).unwrap();

        let keywords = SpecialKeywords::load(Some(file.path())).unwrap();
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords.get("campus"), Some("Seoul and Cheonan"));
        assert_eq!(keywords.get("김진석"), None);
    }

    #[test]
    fn test_load_rejects_non_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();
        assert!(SpecialKeywords::load(Some(file.path())).is_err());
    }
}
