//! Common utilities shared across the campus tools.
//!
//! Result builders, argument parsing and the small normalizations every
//! query tool applies to its inputs.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content, JsonObject},
};
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{error, warn};

use crate::core::db::{Record, StoreError};
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// Structured payload of every record-list tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RecordList {
    /// Number of records returned.
    pub count: usize,
    /// Matching rows, column name to value.
    pub records: Vec<Record>,
}

/// Treat a missing or empty optional argument the same way.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Deserialize tool arguments into a params struct.
pub fn parse_arguments<P: DeserializeOwned>(args: JsonObject) -> Result<P, McpError> {
    serde_json::from_value(serde_json::Value::Object(args))
        .map_err(|e| McpError::invalid_params(e.to_string(), None))
}

/// Deserialize HTTP tool arguments into a params struct.
#[cfg(feature = "http")]
pub fn parse_http_arguments<P: DeserializeOwned>(
    arguments: serde_json::Value,
) -> Result<P, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Serialize a tool result for the HTTP transport, keeping `structuredContent`.
#[cfg(feature = "http")]
pub fn to_http_value(result: &CallToolResult) -> Result<serde_json::Value, ToolError> {
    serde_json::to_value(result).map_err(|e| ToolError::internal(e.to_string()))
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create an error result for a failed store call.
pub fn store_error_result(action: &str, err: &StoreError) -> CallToolResult {
    match err {
        StoreError::MissingConfig => error_result(&err.to_string()),
        StoreError::Database(_) => {
            error!("{} failed: {}", action, err);
            CallToolResult::error(vec![Content::text(format!("Failed to {}: {}", action, err))])
        }
    }
}

/// Create a success result carrying a text summary and structured content.
pub fn structured_result<T: Serialize>(summary: String, data: &T) -> CallToolResult {
    match serde_json::to_value(data) {
        Ok(structured) => CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(structured),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => error_result(&format!("Failed to serialize result: {}", e)),
    }
}

/// Create a success result for a list of records.
///
/// The records are repeated as a JSON text block for clients that ignore
/// structured content.
pub fn records_result(summary: String, records: Vec<Record>) -> CallToolResult {
    let list = RecordList {
        count: records.len(),
        records,
    };
    let mut result = structured_result(summary, &list);
    if result.is_error != Some(true) {
        match serde_json::to_string_pretty(&list.records) {
            Ok(json) => result.content.push(Content::text(json)),
            Err(e) => warn!("Could not render records as text: {}", e),
        }
    }
    result
}

/// Summary line for a record list, e.g. `Found 3 meal(s) matching 'lunch'`.
pub fn found_summary(count: usize, noun: &str, criteria: &str) -> String {
    if count == 0 {
        format!("No {} found for {}", noun, criteria)
    } else {
        format!("Found {} {}(s) for {}", count, noun, criteria)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("202012345")), Some("202012345"));
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_records_result_shape() {
        let mut row = Record::new();
        row.insert("title".into(), json!("수강신청 안내"));
        let result = records_result("Found 1 notice(s)".into(), vec![row]);

        assert!(!is_error(&result));
        assert_eq!(first_text(&result), "Found 1 notice(s)");
        assert_eq!(result.content.len(), 2);

        let structured = structured(&result);
        assert_eq!(structured["count"], 1);
        assert_eq!(structured["records"][0]["title"], "수강신청 안내");
    }

    #[test]
    fn test_found_summary() {
        assert_eq!(found_summary(0, "exam", "'x'"), "No exam found for 'x'");
        assert_eq!(found_summary(2, "exam", "'x'"), "Found 2 exam(s) for 'x'");
    }

    #[test]
    fn test_store_error_result_missing_config() {
        let result = store_error_result("insert schedule", &StoreError::MissingConfig);
        assert!(is_error(&result));
        assert!(first_text(&result).contains("DB env vars not set"));
    }

    #[test]
    fn test_parse_arguments_rejects_missing_field() {
        #[derive(serde::Deserialize)]
        #[allow(dead_code)]
        struct P {
            keyword: String,
        }
        let err = parse_arguments::<P>(JsonObject::new()).err().unwrap();
        assert!(err.message.contains("keyword"));
    }
}
