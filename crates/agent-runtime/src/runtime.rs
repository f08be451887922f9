//! Runtime for building agents with dependency injection
//!
//! The AgentRuntime owns the shared resources (model tiers, tool registry,
//! prompt registry) and hands them to the agents it creates.

use agent_core::{Error, Result};
use agent_llm::{ModelSet, ModelTier};
use agent_prompt::PromptRegistry;
use agent_tools::ToolRegistry;
use std::sync::Arc;
use tracing::debug;

use crate::agents::{AnalystAgent, ResearchAgent};
use crate::events::{ExecutorEventHandler, TracingEventHandler};
use crate::executor::{AgentExecutor, ExecutorConfig};
use crate::prompts::register_default_prompts;

/// Configuration for the agent runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pass budget applied to research agents whose config leaves the default
    pub default_max_iterations: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_max_iterations: 10,
        }
    }
}

/// Runtime for creating agents
///
/// # Example
///
/// ```no_run
/// use agent_llm::{ModelSet, ModelTier, ScriptedModel};
/// use agent_runtime::{AgentRuntime, ExecutorConfig};
/// use std::sync::Arc;
///
/// # fn example() -> agent_core::Result<()> {
/// let runtime = AgentRuntime::builder()
///     .models(ModelSet::uniform(Arc::new(ScriptedModel::repeating("Final Answer: ok"))))
///     .build()?;
///
/// let researcher = runtime.create_research_agent(ExecutorConfig::default(), "researcher")?;
/// let analyst = runtime.create_analyst_agent("news.analyze_headlines", ModelTier::Fast, "analyst")?;
/// # Ok(())
/// # }
/// ```
pub struct AgentRuntime {
    models: ModelSet,
    tool_registry: Arc<ToolRegistry>,
    prompts: Arc<PromptRegistry>,
    config: RuntimeConfig,
    event_handler: Arc<dyn ExecutorEventHandler>,
}

impl AgentRuntime {
    /// Create a new runtime builder
    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    pub fn models(&self) -> &ModelSet {
        &self.models
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    pub fn prompts(&self) -> &Arc<PromptRegistry> {
        &self.prompts
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Create a research agent driven by the model of `config.tier`
    pub fn create_research_agent(
        &self,
        config: ExecutorConfig,
        name: impl Into<String>,
    ) -> Result<ResearchAgent> {
        let name = name.into();
        debug!(agent = %name, tier = %config.tier, max_iterations = config.max_iterations, "Creating research agent");

        let executor = AgentExecutor::builder()
            .model(self.models.get(config.tier))
            .tool_registry(self.tool_registry.clone())
            .prompts(self.prompts.clone())
            .config(config)
            .event_handler(self.event_handler.clone())
            .build()?;

        Ok(ResearchAgent::new(executor, name))
    }

    /// Create a research agent with the runtime's default pass budget
    pub fn create_default_research_agent(&self, name: impl Into<String>) -> Result<ResearchAgent> {
        let config = ExecutorConfig {
            max_iterations: self.config.default_max_iterations,
            ..ExecutorConfig::default()
        };
        self.create_research_agent(config, name)
    }

    /// Create a single-call analyst agent for `template`
    ///
    /// Fails if the template is not registered.
    pub fn create_analyst_agent(
        &self,
        template: &str,
        tier: ModelTier,
        name: impl Into<String>,
    ) -> Result<AnalystAgent> {
        if !self.prompts.contains(template) {
            return Err(Error::Configuration(format!(
                "Prompt template '{template}' is not registered"
            )));
        }
        Ok(AnalystAgent::new(
            self.models.get(tier),
            self.prompts.clone(),
            template,
            name,
        ))
    }
}

/// Builder for AgentRuntime
pub struct AgentRuntimeBuilder {
    models: Option<ModelSet>,
    tool_registry: Option<Arc<ToolRegistry>>,
    prompts: Option<Arc<PromptRegistry>>,
    config: RuntimeConfig,
    event_handler: Arc<dyn ExecutorEventHandler>,
}

impl AgentRuntimeBuilder {
    /// Create a new runtime builder
    pub fn new() -> Self {
        Self {
            models: None,
            tool_registry: None,
            prompts: None,
            config: RuntimeConfig::default(),
            event_handler: Arc::new(TracingEventHandler),
        }
    }

    /// Set the fast and capable models
    pub fn models(mut self, models: ModelSet) -> Self {
        self.models = Some(models);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = Some(registry);
        self
    }

    /// Set the prompt registry
    ///
    /// The runtime's built-in templates are added to it unless a template
    /// with the same id is already registered.
    pub fn prompts(mut self, prompts: Arc<PromptRegistry>) -> Self {
        self.prompts = Some(prompts);
        self
    }

    /// Set the runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default max iterations
    pub fn default_max_iterations(mut self, max: usize) -> Self {
        self.config.default_max_iterations = max;
        self
    }

    /// Set the event handler shared by every research agent
    pub fn event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = handler;
        self
    }

    /// Build the runtime
    ///
    /// # Errors
    ///
    /// Returns an error if no models are set
    pub fn build(self) -> Result<AgentRuntime> {
        let models = self
            .models
            .ok_or_else(|| Error::InitializationFailed("Models not set".to_string()))?;

        let prompts = self.prompts.unwrap_or_default();
        let defaults = PromptRegistry::new();
        register_default_prompts(&defaults)?;
        for id in defaults.list() {
            if prompts.contains(&id) {
                continue;
            }
            if let Some(template) = defaults.get(&id) {
                prompts.register_arc(template);
            }
        }

        Ok(AgentRuntime {
            models,
            tool_registry: self
                .tool_registry
                .unwrap_or_else(|| Arc::new(ToolRegistry::new())),
            prompts,
            config: self.config,
            event_handler: self.event_handler,
        })
    }
}

impl Default for AgentRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
