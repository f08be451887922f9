//! Analyst agent implementation (one prompt, one model call, no tools)

use agent_core::{Agent, Context, Result};
use agent_llm::LanguageModel;
use agent_prompt::PromptRegistry;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, instrument};

/// An agent that renders one template and asks the model once
///
/// Used for headline analysis with the fast model.
pub struct AnalystAgent {
    model: Arc<dyn LanguageModel>,
    prompts: Arc<PromptRegistry>,
    template: String,
    name: String,
}

impl AnalystAgent {
    /// Create a new analyst agent
    ///
    /// # Arguments
    ///
    /// * `model` - The model to ask
    /// * `prompts` - Registry holding `template`
    /// * `template` - Template id rendered for every request
    /// * `name` - Name of the agent
    pub fn new(
        model: Arc<dyn LanguageModel>,
        prompts: Arc<PromptRegistry>,
        template: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            model,
            prompts,
            template: template.into(),
            name: name.into(),
        }
    }

    /// Render the template with `vars` and return the model's reply
    #[instrument(skip(self, vars), fields(template = %self.template, model = self.model.model_id()))]
    pub async fn analyze(&self, vars: &Value) -> Result<String> {
        let prompt = self.prompts.render(&self.template, vars)?;
        debug!(prompt_length = prompt.len(), "Sending analysis prompt");
        let reply = self.model.generate(&prompt).await?;
        Ok(reply.trim().to_string())
    }
}

#[async_trait]
impl Agent for AnalystAgent {
    /// Renders the template with `{ "input": input }`
    async fn process(&self, input: String, _context: &mut Context) -> Result<String> {
        self.analyze(&json!({ "input": input })).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
