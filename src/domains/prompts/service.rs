//! Prompt service implementation.
//!
//! Renders registered templates against the caller's arguments plus a set of
//! clock variables taken at call time in KST:
//! `today`, `time` (`HH:MM`), `weekday`, `yesterday`, `tomorrow`, `timezone`.

use chrono::{DateTime, FixedOffset};
use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};
use std::collections::HashMap;
use tracing::{debug, info};

use super::error::PromptError;
use super::registry::get_all_prompts;
use super::templates::PromptTemplate;
use crate::core::clock::{TIMEZONE_LABEL, now_kst, shifted_date};

/// Service for listing and rendering prompts.
pub struct PromptService {
    /// Key: prompt name, Value: prompt template
    prompts: HashMap<String, PromptTemplate>,
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptService {
    pub fn new() -> Self {
        info!("Initializing PromptService");

        let mut service = Self {
            prompts: HashMap::new(),
        };
        for template in get_all_prompts() {
            service.register_prompt(template);
        }
        service
    }

    /// Register a prompt template.
    pub fn register_prompt(&mut self, template: PromptTemplate) {
        debug!("Registering prompt: {}", template.name);
        self.prompts.insert(template.name.clone(), template);
    }

    /// List all available prompts.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        self.prompts
            .values()
            .map(|template| Prompt {
                name: template.name.clone(),
                title: None,
                description: template.description.clone(),
                arguments: Some(template.arguments.clone()),
                icons: None,
                meta: None,
            })
            .collect()
    }

    /// Render a prompt against the current KST clock.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        self.get_prompt_at(name, arguments, &now_kst())
    }

    /// Render a prompt against a fixed instant.
    pub fn get_prompt_at(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
        now: &DateTime<FixedOffset>,
    ) -> Result<GetPromptResult, PromptError> {
        let template = self
            .prompts
            .get(name)
            .ok_or_else(|| PromptError::not_found(name))?;

        let arguments = arguments.unwrap_or_default();
        for arg in &template.arguments {
            if arg.required.unwrap_or(false) && !arguments.contains_key(&arg.name) {
                return Err(PromptError::missing_argument(&arg.name));
            }
        }

        // Only declared arguments are interpolated; clock values always win.
        let mut variables: HashMap<String, String> = template
            .arguments
            .iter()
            .filter_map(|arg| arguments.get_key_value(&arg.name))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        variables.extend(clock_variables(now));
        let content = template.render(&variables)?;

        let mut messages = vec![PromptMessage::new_text(PromptMessageRole::Assistant, content)];
        if let Some(user_message) = template
            .user_argument
            .as_ref()
            .and_then(|arg| arguments.get(arg))
        {
            messages.push(PromptMessage::new_text(
                PromptMessageRole::User,
                user_message.clone(),
            ));
        }

        Ok(GetPromptResult {
            description: template.description.clone(),
            messages,
        })
    }
}

fn clock_variables(now: &DateTime<FixedOffset>) -> HashMap<String, String> {
    HashMap::from([
        ("today".to_string(), now.format("%Y-%m-%d").to_string()),
        ("time".to_string(), now.format("%H:%M").to_string()),
        ("weekday".to_string(), now.format("%A").to_string()),
        ("yesterday".to_string(), shifted_date(now, -1)),
        ("tomorrow".to_string(), shifted_date(now, 1)),
        ("timezone".to_string(), TIMEZONE_LABEL.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::kst;
    use chrono::TimeZone;

    fn text(message: &PromptMessage) -> String {
        let value = serde_json::to_value(message).unwrap();
        value["content"]["text"].as_str().unwrap().to_string()
    }

    fn role(message: &PromptMessage) -> String {
        serde_json::to_value(message).unwrap()["role"]
            .as_str()
            .unwrap()
            .to_string()
    }

    fn message_args(message: &str) -> Option<HashMap<String, String>> {
        Some(HashMap::from([("message".to_string(), message.to_string())]))
    }

    #[tokio::test]
    async fn test_list_prompts() {
        let prompts = PromptService::new().list_prompts().await;
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, "default_prompt");
        assert_eq!(prompts[0].arguments.as_ref().unwrap()[0].name, "message");
    }

    #[test]
    fn test_default_prompt_anchors_dates() {
        let service = PromptService::new();
        let now = kst().with_ymd_and_hms(2025, 1, 1, 8, 5, 0).unwrap();
        let result = service
            .get_prompt_at("default_prompt", message_args("오늘 점심 뭐야?"), &now)
            .unwrap();

        assert_eq!(result.messages.len(), 2);
        assert_eq!(role(&result.messages[0]), "assistant");
        let instruction = text(&result.messages[0]);
        assert!(instruction.contains("- Today: 2025-01-01 (Wednesday), Current time: 08:05"));
        assert!(instruction.contains("'yesterday/어제' = 2024-12-31"));
        assert!(instruction.contains("'tomorrow/내일' = 2025-01-02"));
        assert!(instruction.contains("Asia/Seoul (KST, UTC+9)"));
        assert!(!instruction.contains("{{"));

        assert_eq!(role(&result.messages[1]), "user");
        assert_eq!(text(&result.messages[1]), "오늘 점심 뭐야?");
    }

    #[test]
    fn test_message_braces_left_verbatim() {
        let service = PromptService::new();
        let now = kst().with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let result = service
            .get_prompt_at("default_prompt", message_args("{{today}}"), &now)
            .unwrap();
        assert_eq!(text(&result.messages[1]), "{{today}}");
    }

    #[test]
    fn test_extra_arguments_cannot_replace_clock_values() {
        let service = PromptService::new();
        let now = kst().with_ymd_and_hms(2025, 1, 1, 8, 5, 0).unwrap();
        let args = HashMap::from([
            ("message".to_string(), "hi".to_string()),
            ("today".to_string(), "1999-12-31".to_string()),
            ("timezone".to_string(), "UTC".to_string()),
        ]);
        let result = service
            .get_prompt_at("default_prompt", Some(args), &now)
            .unwrap();

        let instruction = text(&result.messages[0]);
        assert!(instruction.contains("- Today: 2025-01-01 (Wednesday)"));
        assert!(!instruction.contains("1999-12-31"));
        assert!(instruction.contains("Asia/Seoul (KST, UTC+9)"));
        assert_eq!(text(&result.messages[1]), "hi");
    }

    #[tokio::test]
    async fn test_missing_message() {
        let result = PromptService::new().get_prompt("default_prompt", None).await;
        assert!(matches!(result, Err(PromptError::MissingArgument(_))));
    }

    #[tokio::test]
    async fn test_get_nonexistent_prompt() {
        let result = PromptService::new().get_prompt("greeting", None).await;
        assert!(matches!(result, Err(PromptError::NotFound(_))));
    }
}
