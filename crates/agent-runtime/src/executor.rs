//! Research loop executor
//!
//! The AgentExecutor drives one research run through an explicit state
//! machine:
//!
//! ```text
//! Start -> (Thinking -> Acting -> Observing)* -> Done | Aborted
//! ```
//!
//! - Thinking renders the ReAct prompt, calls the model, and parses the reply
//!   into an action or a final answer. Unparseable replies go straight to
//!   Observing with a parse-failure observation.
//! - Acting resolves and invokes the tool. Unknown tools and tool failures
//!   become observations; they never end the run.
//! - Observing appends the observation and closes the pass. When the pass
//!   budget is spent the run is aborted, never silently finished.
//!
//! A model failure aborts the run. Cancellation is checked between steps
//! only, before any new model or tool call.

use crate::events::{ExecutorEventHandler, TracingEventHandler};
use crate::parser::{ReactParser, ReactStep};
use crate::prompts::{REACT_TEMPLATE, register_default_prompts};
use crate::transcript::{AbortReason, AgentRun, ObservationSource, RunOutcome, RunReport};
use agent_core::{Context, Error, Result};
use agent_llm::{LanguageModel, ModelTier};
use agent_prompt::PromptRegistry;
use agent_tools::ToolRegistry;
use agent_utils::preview;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Observation used when a tool returns only whitespace
const EMPTY_TOOL_OUTPUT: &str = "(the tool returned no output)";

/// Configuration for research runs
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum Thinking/Acting/Observing passes before the run is aborted
    pub max_iterations: usize,

    /// Which model tier drives the loop
    pub tier: ModelTier,

    /// Stop sequences passed to the model so it does not invent observations
    pub stop_sequences: Vec<String>,

    /// Prompt template rendered on every Thinking step
    pub prompt_template: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tier: ModelTier::Capable,
            stop_sequences: vec!["\nObservation:".to_string()],
            prompt_template: REACT_TEMPLATE.to_string(),
        }
    }
}

impl ExecutorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::Configuration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loop state between steps
#[derive(Debug)]
enum Step {
    Thinking,
    Acting { tool: String, input: String },
    Observing {
        text: String,
        source: ObservationSource,
        duration_ms: u64,
    },
    Done { answer: String },
    Aborted { reason: AbortReason },
}

/// Executes research runs against one model and a shared tool registry
///
/// The executor holds no per-run state, so one executor may drive many runs
/// concurrently.
pub struct AgentExecutor {
    model: Arc<dyn LanguageModel>,
    tool_registry: Arc<ToolRegistry>,
    prompts: Arc<PromptRegistry>,
    parser: ReactParser,
    config: ExecutorConfig,
    event_handler: Arc<dyn ExecutorEventHandler>,
}

impl AgentExecutor {
    /// Create a new builder
    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder::new()
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// Set the event handler for receiving execution events
    pub fn with_event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = handler;
        self
    }

    /// Run the loop for `goal` until a final answer or an abort
    ///
    /// Returns `Err` only for setup problems (for example a prompt template
    /// that fails to render). Every runtime failure is reported through the
    /// returned [`RunOutcome`].
    #[instrument(skip(self, goal, context), fields(run_id = %context.run_id(), model = self.model.model_id()))]
    pub async fn run(&self, goal: &str, context: &Context) -> Result<RunReport> {
        let mut run = AgentRun::new(context.run_id(), goal);
        let mut step = Step::Thinking;

        info!(
            max_iterations = self.config.max_iterations,
            tool_count = self.tool_registry.len(),
            goal_preview = %preview(goal, 200),
            "Research run started"
        );

        loop {
            // A finished tool call is still observed; new work is not started
            if context.is_cancelled() && matches!(step, Step::Thinking | Step::Acting { .. }) {
                info!("Cancellation requested");
                step = Step::Aborted {
                    reason: AbortReason::Cancelled,
                };
            }

            step = match step {
                Step::Thinking => self.think(&mut run).await?,
                Step::Acting { tool, input } => self.act(&tool, &input).await,
                Step::Observing {
                    text,
                    source,
                    duration_ms,
                } => self.observe(&mut run, text, source, duration_ms).await?,
                Step::Done { answer } => {
                    run.finish(answer.clone())?;
                    self.event_handler
                        .on_finish(run.id(), &answer, run.iteration_count())
                        .await;
                    return Ok(RunReport {
                        outcome: RunOutcome::Completed { answer },
                        run,
                    });
                }
                Step::Aborted { reason } => {
                    run.fail()?;
                    self.event_handler
                        .on_abort(run.id(), &reason, run.iteration_count())
                        .await;
                    let partial = run.partial_result();
                    return Ok(RunReport {
                        outcome: RunOutcome::Aborted { reason, partial },
                        run,
                    });
                }
            };
        }
    }

    async fn think(&self, run: &mut AgentRun) -> Result<Step> {
        let prompt = self.render_prompt(run)?;
        debug!(
            iteration = run.iteration_count() + 1,
            prompt_length = prompt.len(),
            "Thinking"
        );

        let reply = match self
            .model
            .generate_until(&prompt, &self.config.stop_sequences)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Language model call failed");
                return Ok(Step::Aborted {
                    reason: AbortReason::ModelUnavailable {
                        detail: e.to_string(),
                    },
                });
            }
        };
        debug!(reply_preview = %preview(&reply, 300), "Model replied");

        match self.parser.parse(&reply) {
            Ok(ReactStep::Action {
                thought,
                tool,
                input,
            }) => {
                self.record_thought(run, thought).await?;
                run.record_action(&tool, &input)?;
                self.event_handler.on_action(run.id(), &tool, &input).await;
                Ok(Step::Acting { tool, input })
            }
            Ok(ReactStep::FinalAnswer { thought, answer }) => {
                self.record_thought(run, thought).await?;
                Ok(Step::Done { answer })
            }
            Err(e) => {
                let raw = reply.trim();
                if !raw.is_empty() {
                    self.record_thought(run, Some(raw.to_string())).await?;
                }
                Ok(Step::Observing {
                    text: format!(
                        "Invalid format: {e}. Reply with 'Action:' and 'Action Input:' lines, or with a 'Final Answer:' line."
                    ),
                    source: ObservationSource::ParseFailure,
                    duration_ms: 0,
                })
            }
        }
    }

    async fn act(&self, tool_name: &str, input: &str) -> Step {
        let tool = match self.tool_registry.resolve(tool_name) {
            Ok(tool) => tool,
            Err(_) => {
                return Step::Observing {
                    text: format!(
                        "{tool_name} is not a valid tool, try one of [{}].",
                        self.tool_registry.names().join(", ")
                    ),
                    source: ObservationSource::UnknownTool,
                    duration_ms: 0,
                };
            }
        };

        let start = Instant::now();
        let result = tool.invoke(input).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let (text, source) = match result {
            Ok(output) if output.trim().is_empty() => {
                (EMPTY_TOOL_OUTPUT.to_string(), ObservationSource::Tool)
            }
            Ok(output) => (output, ObservationSource::Tool),
            Err(e) => (format!("Error: {e}"), ObservationSource::ToolError),
        };

        Step::Observing {
            text,
            source,
            duration_ms,
        }
    }

    async fn observe(
        &self,
        run: &mut AgentRun,
        text: String,
        source: ObservationSource,
        duration_ms: u64,
    ) -> Result<Step> {
        let iteration = run.record_observation(text.clone(), source)?;
        self.event_handler
            .on_observation(run.id(), iteration, &text, source, duration_ms)
            .await;

        if iteration >= self.config.max_iterations {
            warn!(
                iteration,
                max_iterations = self.config.max_iterations,
                "Iteration budget exhausted"
            );
            return Ok(Step::Aborted {
                reason: AbortReason::IterationBudgetExhausted {
                    max: self.config.max_iterations,
                },
            });
        }
        Ok(Step::Thinking)
    }

    async fn record_thought(&self, run: &mut AgentRun, thought: Option<String>) -> Result<()> {
        if let Some(text) = thought {
            run.record_thought(&text)?;
            self.event_handler.on_thought(run.id(), &text).await;
        }
        Ok(())
    }

    fn render_prompt(&self, run: &AgentRun) -> Result<String> {
        let vars = json!({
            "goal": run.goal(),
            "tools": self.tool_registry.descriptors(),
            "tool_names": self.tool_registry.names().join(", "),
            "scratchpad": run.transcript().scratchpad(),
        });
        Ok(self.prompts.render(&self.config.prompt_template, &vars)?)
    }
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    model: Option<Arc<dyn LanguageModel>>,
    tool_registry: Arc<ToolRegistry>,
    prompts: Option<Arc<PromptRegistry>>,
    config: ExecutorConfig,
    event_handler: Arc<dyn ExecutorEventHandler>,
}

impl AgentExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            model: None,
            tool_registry: Arc::new(ToolRegistry::new()),
            prompts: None,
            config: ExecutorConfig::default(),
            event_handler: Arc::new(TracingEventHandler),
        }
    }

    /// Set the model driving the loop
    pub fn model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = registry;
        self
    }

    /// Set the prompt registry (defaults to one holding the built-in templates)
    pub fn prompts(mut self, prompts: Arc<PromptRegistry>) -> Self {
        self.prompts = Some(prompts);
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the event handler
    pub fn event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = handler;
        self
    }

    /// Build the executor
    pub fn build(self) -> Result<AgentExecutor> {
        self.config.validate()?;

        let model = self
            .model
            .ok_or_else(|| Error::InitializationFailed("Model not set".to_string()))?;

        let prompts = match self.prompts {
            Some(prompts) => prompts,
            None => {
                let prompts = PromptRegistry::new();
                register_default_prompts(&prompts)?;
                Arc::new(prompts)
            }
        };

        Ok(AgentExecutor {
            model,
            tool_registry: self.tool_registry,
            prompts,
            parser: ReactParser::new()?,
            config: self.config,
            event_handler: self.event_handler,
        })
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
