//! Prompt template registry
//!
//! [`PromptRegistry`] is the Prompt Formatter seen by the rest of the system:
//! `render(template_id, vars) -> String`.

use crate::{PromptError, PromptTemplate, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// A thread-safe registry of prompt templates
///
/// Registering a template under an existing name replaces it, which is how
/// file overrides take precedence over built-in defaults.
pub struct PromptRegistry {
    templates: RwLock<HashMap<String, Arc<dyn PromptTemplate>>>,
}

impl PromptRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
        }
    }

    /// Register a template, replacing any template with the same name
    pub fn register<T: PromptTemplate + 'static>(&self, template: T) {
        self.register_arc(Arc::new(template));
    }

    /// Register a template wrapped in Arc
    pub fn register_arc(&self, template: Arc<dyn PromptTemplate>) {
        if let Ok(mut templates) = self.templates.write() {
            let name = template.name().to_string();
            if templates.insert(name.clone(), template).is_some() {
                debug!(template = %name, "Replaced prompt template");
            }
        }
    }

    /// Register multiple templates at once
    pub fn register_all<T: PromptTemplate + 'static>(&self, templates: Vec<T>) {
        for template in templates {
            self.register(template);
        }
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn PromptTemplate>> {
        self.templates.read().ok()?.get(name).cloned()
    }

    /// Check if a template is registered
    pub fn contains(&self, name: &str) -> bool {
        self.templates
            .read()
            .map(|t| t.contains_key(name))
            .unwrap_or(false)
    }

    /// Render a registered template
    ///
    /// Fails with [`PromptError::TemplateNotRegistered`] for an unknown id and
    /// [`PromptError::MissingVariable`] when `vars` lacks a referenced name.
    pub fn render(&self, name: &str, vars: &serde_json::Value) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| PromptError::TemplateNotRegistered(name.to_string()))?;
        template.render(vars)
    }

    /// Names of all registered templates, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .templates
            .read()
            .map(|t| t.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Number of registered templates
    pub fn len(&self) -> usize {
        self.templates.read().map(|t| t.len()).unwrap_or(0)
    }

    /// Whether no template is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRegistry")
            .field("templates", &self.list())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JinjaTemplate;
    use serde_json::json;

    #[test]
    fn test_register_and_get() {
        let registry = PromptRegistry::new();
        registry.register(JinjaTemplate::new("test", "Hello").unwrap());

        assert!(registry.contains("test"));
        assert!(registry.get("test").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_render() {
        let registry = PromptRegistry::new();
        registry.register(JinjaTemplate::new("greeting", "Hello, {{ name }}!").unwrap());

        let result = registry.render("greeting", &json!({ "name": "World" })).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_render_unregistered() {
        let registry = PromptRegistry::new();
        assert!(matches!(
            registry.render("nope", &json!({})),
            Err(PromptError::TemplateNotRegistered(ref n)) if n == "nope"
        ));
    }

    #[test]
    fn test_render_twice_is_identical() {
        let registry = PromptRegistry::new();
        registry.register(JinjaTemplate::new("goal", "Research {{ company }} ({{ n }})").unwrap());
        let vars = json!({ "company": "IBM", "n": 3 });

        assert_eq!(
            registry.render("goal", &vars).unwrap(),
            registry.render("goal", &vars).unwrap()
        );
    }

    #[test]
    fn test_register_replaces() {
        let registry = PromptRegistry::new();
        registry.register(JinjaTemplate::new("t", "old").unwrap());
        registry.register(JinjaTemplate::new("t", "new").unwrap());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.render("t", &json!({})).unwrap(), "new");
    }

    #[test]
    fn test_list_sorted() {
        let registry = PromptRegistry::new();
        registry.register_all(vec![
            JinjaTemplate::new("b", "").unwrap(),
            JinjaTemplate::new("a", "").unwrap(),
        ]);
        assert_eq!(registry.list(), vec!["a", "b"]);
        assert!(!registry.is_empty());
    }
}
