//! MiniJinja-based templates
//!
//! Template syntax is standard Jinja2:
//! - Variables: `{{ variable }}`
//! - Filters: `{{ name | upper }}`
//! - Conditionals: `{% if condition %}...{% endif %}`
//! - Loops: `{% for item in items %}...{% endfor %}`

use crate::{PromptError, Result};
use minijinja::{Environment, ErrorKind, UndefinedBehavior};

/// A named template that renders variables into a prompt
///
/// Variables are passed as `serde_json::Value` so the trait stays
/// dyn-compatible.
pub trait PromptTemplate: Send + Sync {
    /// Get the template name/identifier
    fn name(&self) -> &str;

    /// Render the template with `vars`
    fn render(&self, vars: &serde_json::Value) -> Result<String>;

    /// The unrendered template source
    fn raw_template(&self) -> &str;
}

/// A prompt template backed by MiniJinja
pub struct JinjaTemplate {
    name: String,
    source: String,
}

impl JinjaTemplate {
    /// Create a template, checking its syntax up front
    ///
    /// ```
    /// use agent_prompt::{JinjaTemplate, PromptError};
    ///
    /// assert!(JinjaTemplate::new("ok", "Hello, {{ name }}!").is_ok());
    /// assert!(matches!(
    ///     JinjaTemplate::new("broken", "{{ unclosed"),
    ///     Err(PromptError::TemplateParseFailed { .. })
    /// ));
    /// ```
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let source = source.into();

        Environment::new()
            .template_from_str(&source)
            .map_err(|e| PromptError::TemplateParseFailed {
                name: name.clone(),
                detail: e.to_string(),
            })?;

        Ok(Self { name, source })
    }

    fn environment(&self) -> Environment<'_> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env
    }
}

impl PromptTemplate for JinjaTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, vars: &serde_json::Value) -> Result<String> {
        let env = self.environment();
        let template =
            env.template_from_named_str(&self.name, &self.source)
                .map_err(|e| PromptError::TemplateParseFailed {
                    name: self.name.clone(),
                    detail: e.to_string(),
                })?;

        template
            .render(minijinja::Value::from_serialize(vars))
            .map_err(|e| match e.kind() {
                ErrorKind::UndefinedError => PromptError::MissingVariable {
                    template: self.name.clone(),
                    detail: e.to_string(),
                },
                _ => PromptError::RenderError {
                    name: self.name.clone(),
                    detail: e.to_string(),
                },
            })
    }

    fn raw_template(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaTemplate")
            .field("name", &self.name)
            .field("len", &self.source.len())
            .finish()
    }
}
