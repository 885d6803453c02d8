//! Prompt templates and the `{{variable}}` renderer.

use rmcp::model::PromptArgument;
use std::collections::HashMap;

use super::error::PromptError;

/// A prompt template that can be instantiated with variables.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,

    pub description: Option<String>,

    /// Arguments advertised to clients.
    pub arguments: Vec<PromptArgument>,

    /// Template text with `{{variable}}` placeholders.
    pub template: String,

    /// Argument echoed as a user message after the rendered text.
    pub user_argument: Option<String>,
}

impl PromptTemplate {
    /// Replace every `{{name}}` with its value.
    ///
    /// Whitespace inside the braces is ignored. A placeholder with no value,
    /// or an unclosed `{{`, is a template error.
    pub fn render(&self, variables: &HashMap<String, String>) -> Result<String, PromptError> {
        let mut output = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find("{{") {
            output.push_str(&rest[..open]);
            let after_open = &rest[open + 2..];
            let close = after_open.find("}}").ok_or_else(|| {
                PromptError::template(format!("Unclosed placeholder in '{}'", self.name))
            })?;

            let key = after_open[..close].trim();
            let value = variables
                .get(key)
                .ok_or_else(|| PromptError::template(format!("No value for '{{{{{}}}}}'", key)))?;
            output.push_str(value);
            rest = &after_open[close + 2..];
        }
        output.push_str(rest);

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(text: &str) -> PromptTemplate {
        PromptTemplate {
            name: "test".to_string(),
            description: None,
            arguments: vec![],
            template: text.to_string(),
            user_argument: None,
        }
    }

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitution() {
        let rendered = template("Today: {{today}} ({{ weekday }})")
            .render(&vars(&[("today", "2025-10-21"), ("weekday", "Tuesday")]))
            .unwrap();
        assert_eq!(rendered, "Today: 2025-10-21 (Tuesday)");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let rendered = template("{{a}}")
            .render(&vars(&[("a", "{{b}}")]))
            .unwrap();
        assert_eq!(rendered, "{{b}}");
    }

    #[test]
    fn test_missing_value_is_error() {
        let err = template("Hi {{name}}").render(&HashMap::new()).unwrap_err();
        assert!(matches!(err, PromptError::Template(_)));
        assert!(err.to_string().contains("{{name}}"));
    }

    #[test]
    fn test_unclosed_placeholder_is_error() {
        assert!(template("Hi {{name").render(&vars(&[("name", "x")])).is_err());
    }
}
