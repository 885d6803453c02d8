//! Date-anchored agent instruction.

use super::PromptDefinition;
use rmcp::model::PromptArgument;

/// System-style instruction followed by the user's own message.
pub struct DefaultPrompt;

impl PromptDefinition for DefaultPrompt {
    const NAME: &'static str = "default_prompt";
    const DESCRIPTION: &'static str = "Instruction anchored to the current KST date (today, yesterday, tomorrow) and tool usage rules, followed by the user's message";
    const USER_ARGUMENT: Option<&'static str> = Some("message");

    fn template() -> &'static str {
        include_str!("../../../../data/prompts/default_prompt.md")
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![PromptArgument {
            name: "message".to_string(),
            title: None,
            description: Some("The user's message".to_string()),
            required: Some(true),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt_metadata() {
        assert_eq!(DefaultPrompt::NAME, "default_prompt");
        assert_eq!(DefaultPrompt::USER_ARGUMENT, Some("message"));

        let args = DefaultPrompt::arguments();
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].required, Some(true));
    }

    #[test]
    fn test_template_uses_clock_placeholders() {
        let template = DefaultPrompt::template();
        for placeholder in ["{{today}}", "{{yesterday}}", "{{tomorrow}}", "{{time}}", "{{weekday}}", "{{timezone}}"] {
            assert!(template.contains(placeholder), "missing {}", placeholder);
        }
        assert!(template.contains("now_kr"));
    }
}
