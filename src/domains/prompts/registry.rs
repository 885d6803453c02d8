//! Prompt Registry - central registration of all prompts.
//!
//! A new prompt is exported from `definitions/` and added to the list here.

use super::definitions::{DefaultPrompt, PromptDefinition};
use super::templates::PromptTemplate;

/// Build a PromptTemplate from a PromptDefinition.
fn build_template<P: PromptDefinition>() -> PromptTemplate {
    PromptTemplate {
        name: P::NAME.to_string(),
        description: Some(P::DESCRIPTION.to_string()),
        arguments: P::arguments(),
        template: P::template().to_string(),
        user_argument: P::USER_ARGUMENT.map(str::to_string),
    }
}

/// Get all registered prompts as PromptTemplates.
pub fn get_all_prompts() -> Vec<PromptTemplate> {
    vec![build_template::<DefaultPrompt>()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lists_default_prompt() {
        let prompts = get_all_prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, DefaultPrompt::NAME);
        assert_eq!(prompts[0].user_argument.as_deref(), Some("message"));
    }
}
