//! Agent runtime for newsdesk
//!
//! This crate provides the research loop and the agents built on it:
//!
//! - [`AgentExecutor`]: the ReAct state machine (Thinking, Acting, Observing)
//! - [`AgentRun`] and [`Transcript`]: the record of one run
//! - [`ReactParser`]: turns model replies into actions or final answers
//! - [`AgentRuntime`]: builds [`ResearchAgent`]s and [`AnalystAgent`]s from
//!   shared models, tools, and prompts

pub mod agents;
pub mod events;
pub mod executor;
pub mod parser;
pub mod prompts;
pub mod runtime;
pub mod transcript;

pub use agents::{AnalystAgent, ResearchAgent};
pub use events::{
    ExecutorEventHandler, NoOpEventHandler, RecordingEventHandler, TraceEvent,
    TracingEventHandler,
};
pub use executor::{AgentExecutor, AgentExecutorBuilder, ExecutorConfig};
pub use parser::{ParseError, ReactParser, ReactStep};
pub use prompts::{REACT_TEMPLATE, register_default_prompts};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder, RuntimeConfig};
pub use transcript::{
    AbortReason, AgentRun, ObservationSource, RunOutcome, RunReport, RunStatus, Transcript,
    TranscriptEntry,
};
