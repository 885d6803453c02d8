//! Prompt definitions module.
//!
//! Each prompt lives in its own file and supplies its metadata, its template
//! text and, optionally, the argument that is echoed as the user's turn.

use rmcp::model::PromptArgument;

mod default_prompt;

pub use default_prompt::DefaultPrompt;

/// Trait for prompt definitions.
pub trait PromptDefinition {
    /// The unique name of the prompt.
    const NAME: &'static str;

    /// A description of what the prompt does.
    const DESCRIPTION: &'static str;

    /// Argument whose raw value follows the rendered text as a user message.
    const USER_ARGUMENT: Option<&'static str> = None;

    /// The template string with {{variable}} placeholders.
    fn template() -> &'static str;

    /// The arguments this prompt accepts.
    fn arguments() -> Vec<PromptArgument>;
}
