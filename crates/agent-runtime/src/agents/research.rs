//! Research agent implementation (wraps AgentExecutor)

use crate::executor::AgentExecutor;
use crate::transcript::{AbortReason, RunOutcome, RunReport};
use agent_core::context::keys;
use agent_core::{Agent, Context, Error, Result};
use async_trait::async_trait;

/// An agent that researches a goal with the ReAct loop
///
/// After every run the full transcript and the outcome are stored in the
/// caller's [`Context`] under [`keys::TRANSCRIPT`] and [`keys::OUTCOME`], so
/// they stay available for diagnostics even when the run aborts.
///
/// # Example
///
/// ```no_run
/// use agent_core::{Agent, Context};
/// use agent_runtime::{AgentRuntime, ExecutorConfig};
///
/// # async fn example(runtime: AgentRuntime) -> agent_core::Result<()> {
/// let agent = runtime.create_research_agent(ExecutorConfig::default(), "researcher")?;
/// let mut context = Context::new().with_subject("IBM");
/// let answer = agent.process("Summarize IBM's latest 10-K".to_string(), &mut context).await?;
/// # Ok(())
/// # }
/// ```
pub struct ResearchAgent {
    executor: AgentExecutor,
    name: String,
}

impl ResearchAgent {
    /// Create a new research agent
    pub fn new(executor: AgentExecutor, name: impl Into<String>) -> Self {
        Self {
            executor,
            name: name.into(),
        }
    }

    /// Get a reference to the underlying executor
    pub fn executor(&self) -> &AgentExecutor {
        &self.executor
    }

    /// Run the loop and return the full report
    pub async fn research(&self, goal: &str, context: &mut Context) -> Result<RunReport> {
        let report = self.executor.run(goal, context).await?;
        context.insert_typed(keys::TRANSCRIPT, report.run.transcript())?;
        context.insert_typed(keys::OUTCOME, &report.outcome)?;
        Ok(report)
    }
}

#[async_trait]
impl Agent for ResearchAgent {
    /// Returns the final answer; aborted runs become errors
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        let report = self.research(&input, context).await?;
        match report.outcome {
            RunOutcome::Completed { answer } => Ok(answer),
            RunOutcome::Aborted { reason, .. } => match reason {
                AbortReason::ModelUnavailable { detail } => {
                    Err(Error::ModelUnavailable(detail))
                }
                other => Err(Error::ProcessingFailed(format!("research aborted: {other}"))),
            },
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
