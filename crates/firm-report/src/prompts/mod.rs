//! Prompt templates and the response schema
//!
//! Everything the model is told lives here:
//! - `system`: the analyst instruction, parameterised by the year range
//! - `user`: the single user message naming the ticker and range
//! - `schema`: the strict JSON schema the reply must follow
//!
//! Templates are MiniJinja sources compiled on demand; nothing is cached.

mod schema;
mod system;
mod user;

pub use schema::report_schema;
pub use system::analysis_instruction;
pub use user::analysis_request;

use crate::error::{ReportError, Result};
use minijinja::Environment;
use serde::Serialize;

/// A named MiniJinja template
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    name: &'static str,
    source: &'static str,
}

impl PromptTemplate {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Render with the given variables
    ///
    /// Undefined variables are an error rather than an empty string.
    pub fn render<S: Serialize>(&self, vars: &S) -> Result<String> {
        let mut env = Environment::new();
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);

        env.render_str(self.source, minijinja::Value::from_serialize(vars))
            .map_err(|e| ReportError::Prompt {
                name: self.name.to_string(),
                detail: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_template() {
        let template = PromptTemplate::new("greeting", "Analyze {{ ticker }} from {{ start }}");
        let text = template.render(&json!({ "ticker": "VNM", "start": 2020 })).unwrap();
        assert_eq!(text, "Analyze VNM from 2020");
        assert_eq!(template.name(), "greeting");
    }

    #[test]
    fn test_missing_variable_is_error() {
        let template = PromptTemplate::new("strict", "Analyze {{ ticker }}");
        let err = template.render(&json!({})).unwrap_err();
        assert!(matches!(err, ReportError::Prompt { ref name, .. } if name == "strict"));
    }

    #[test]
    fn test_syntax_error_is_error() {
        let template = PromptTemplate::new("broken", "{% if %}");
        assert!(template.render(&json!({})).is_err());
    }
}
