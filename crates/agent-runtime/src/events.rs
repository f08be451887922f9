//! Trace sinks for research runs
//!
//! The executor reports every transition to an [`ExecutorEventHandler`].
//! Tools never log their results themselves; observability lives here.

use crate::transcript::{AbortReason, ObservationSource};
use agent_utils::preview;
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};
use uuid::Uuid;

const PREVIEW_CHARS: usize = 300;

/// Event handler for research run events
///
/// All methods default to doing nothing.
#[async_trait]
pub trait ExecutorEventHandler: Send + Sync {
    /// The model produced reasoning text
    async fn on_thought(&self, _run_id: Uuid, _text: &str) {}

    /// The model asked for a tool
    async fn on_action(&self, _run_id: Uuid, _tool: &str, _input: &str) {}

    /// An observation closed a pass
    async fn on_observation(
        &self,
        _run_id: Uuid,
        _iteration: usize,
        _text: &str,
        _source: ObservationSource,
        _duration_ms: u64,
    ) {
    }

    /// The run finished with a final answer
    async fn on_finish(&self, _run_id: Uuid, _answer: &str, _iterations: usize) {}

    /// The run was aborted
    async fn on_abort(&self, _run_id: Uuid, _reason: &AbortReason, _iterations: usize) {}
}

/// No-op event handler for when events are not needed
pub struct NoOpEventHandler;

#[async_trait]
impl ExecutorEventHandler for NoOpEventHandler {}

/// Logs every event through `tracing`
pub struct TracingEventHandler;

#[async_trait]
impl ExecutorEventHandler for TracingEventHandler {
    async fn on_thought(&self, run_id: Uuid, text: &str) {
        info!(%run_id, thought = %preview(text, PREVIEW_CHARS), "Agent thought");
    }

    async fn on_action(&self, run_id: Uuid, tool: &str, input: &str) {
        info!(
            %run_id,
            tool_name = %tool,
            input_preview = %preview(input, PREVIEW_CHARS),
            "Executing tool"
        );
    }

    async fn on_observation(
        &self,
        run_id: Uuid,
        iteration: usize,
        text: &str,
        source: ObservationSource,
        duration_ms: u64,
    ) {
        let result_preview = preview(text, PREVIEW_CHARS);
        match source {
            ObservationSource::Tool => info!(
                %run_id,
                iteration,
                duration_ms,
                result_length = text.len(),
                %result_preview,
                "Tool execution succeeded"
            ),
            ObservationSource::ToolError => warn!(
                %run_id,
                iteration,
                duration_ms,
                error = %result_preview,
                "Tool execution failed"
            ),
            ObservationSource::UnknownTool => warn!(
                %run_id,
                iteration,
                %result_preview,
                "Model requested an unknown tool"
            ),
            ObservationSource::ParseFailure => warn!(
                %run_id,
                iteration,
                %result_preview,
                "Model output could not be parsed"
            ),
        }
    }

    async fn on_finish(&self, run_id: Uuid, answer: &str, iterations: usize) {
        info!(
            %run_id,
            iterations,
            answer_preview = %preview(answer, PREVIEW_CHARS),
            "Research run completed"
        );
    }

    async fn on_abort(&self, run_id: Uuid, reason: &AbortReason, iterations: usize) {
        warn!(%run_id, iterations, %reason, "Research run aborted");
    }
}

/// A recorded trace event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Thought(String),
    Action { tool: String, input: String },
    Observation {
        iteration: usize,
        text: String,
        source: ObservationSource,
    },
    Finish { answer: String, iterations: usize },
    Abort { reason: AbortReason, iterations: usize },
}

/// Keeps every event in memory, for tests and diagnostics
#[derive(Default)]
pub struct RecordingEventHandler {
    events: Mutex<Vec<TraceEvent>>,
}

impl RecordingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in order
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, event: TraceEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[async_trait]
impl ExecutorEventHandler for RecordingEventHandler {
    async fn on_thought(&self, _run_id: Uuid, text: &str) {
        self.push(TraceEvent::Thought(text.to_string()));
    }

    async fn on_action(&self, _run_id: Uuid, tool: &str, input: &str) {
        self.push(TraceEvent::Action {
            tool: tool.to_string(),
            input: input.to_string(),
        });
    }

    async fn on_observation(
        &self,
        _run_id: Uuid,
        iteration: usize,
        text: &str,
        source: ObservationSource,
        _duration_ms: u64,
    ) {
        self.push(TraceEvent::Observation {
            iteration,
            text: text.to_string(),
            source,
        });
    }

    async fn on_finish(&self, _run_id: Uuid, answer: &str, iterations: usize) {
        self.push(TraceEvent::Finish {
            answer: answer.to_string(),
            iterations,
        });
    }

    async fn on_abort(&self, _run_id: Uuid, reason: &AbortReason, iterations: usize) {
        self.push(TraceEvent::Abort {
            reason: reason.clone(),
            iterations,
        });
    }
}
