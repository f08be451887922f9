//! Transcript and run model for research runs
//!
//! An [`AgentRun`] owns its [`Transcript`] exclusively. The transcript is
//! append-only and ordered by the loop pass that produced each entry. Once a
//! run is finished or failed it rejects every further transition.

use agent_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Where an observation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationSource {
    /// Text returned by a tool
    Tool,
    /// A tool failed; the text describes the failure
    ToolError,
    /// The model named a tool that is not registered
    UnknownTool,
    /// The model output could not be parsed
    ParseFailure,
}

/// One step of a research run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptEntry {
    Thought {
        text: String,
    },
    Action {
        tool: String,
        input: String,
    },
    Observation {
        text: String,
        source: ObservationSource,
    },
    FinalAnswer {
        text: String,
    },
}

impl TranscriptEntry {
    /// Short label for tables and logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Thought { .. } => "Thought",
            Self::Action { .. } => "Action",
            Self::Observation { .. } => "Observation",
            Self::FinalAnswer { .. } => "Final Answer",
        }
    }

    /// The entry's main text
    pub fn text(&self) -> String {
        match self {
            Self::Thought { text } | Self::FinalAnswer { text } => text.clone(),
            Self::Action { tool, input } => format!("{tool}({input})"),
            Self::Observation { text, .. } => text.clone(),
        }
    }
}

/// Append-only, ordered list of transcript entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }

    /// Number of observations recorded
    pub fn observation_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, TranscriptEntry::Observation { .. }))
            .count()
    }

    /// Render the transcript in ReAct text form for the next prompt
    ///
    /// ```text
    /// Thought: ...
    /// Action: Echo
    /// Action Input: hi
    /// Observation: hi
    /// ```
    pub fn scratchpad(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match entry {
                TranscriptEntry::Thought { text } => {
                    out.push_str(&format!("Thought: {text}\n"));
                }
                TranscriptEntry::Action { tool, input } => {
                    out.push_str(&format!("Action: {tool}\nAction Input: {input}\n"));
                }
                TranscriptEntry::Observation { text, .. } => {
                    out.push_str(&format!("Observation: {text}\n"));
                }
                TranscriptEntry::FinalAnswer { text } => {
                    out.push_str(&format!("Final Answer: {text}\n"));
                }
            }
        }
        out
    }

    fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Lifecycle state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

/// State of one research run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRun {
    id: Uuid,
    goal: String,
    transcript: Transcript,
    status: RunStatus,
    iteration_count: usize,
}

impl AgentRun {
    /// Start a run with an empty transcript
    pub fn new(id: Uuid, goal: impl Into<String>) -> Self {
        Self {
            id,
            goal: goal.into(),
            transcript: Transcript::default(),
            status: RunStatus::Running,
            iteration_count: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Completed Thinking/Acting/Observing passes
    ///
    /// Equals the number of observations while running. A run that finishes
    /// reports at least one pass, since the pass that produced the final
    /// answer counts.
    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    pub fn is_closed(&self) -> bool {
        self.status != RunStatus::Running
    }

    pub fn record_thought(&mut self, text: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        self.transcript.push(TranscriptEntry::Thought { text: text.into() });
        Ok(())
    }

    pub fn record_action(&mut self, tool: impl Into<String>, input: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        self.transcript.push(TranscriptEntry::Action {
            tool: tool.into(),
            input: input.into(),
        });
        Ok(())
    }

    /// Append an observation, closing the current pass
    ///
    /// Returns the new iteration count.
    pub fn record_observation(
        &mut self,
        text: impl Into<String>,
        source: ObservationSource,
    ) -> Result<usize> {
        self.ensure_open()?;
        self.transcript.push(TranscriptEntry::Observation {
            text: text.into(),
            source,
        });
        self.iteration_count += 1;
        Ok(self.iteration_count)
    }

    /// Record the final answer and close the run as finished
    pub fn finish(&mut self, answer: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        self.transcript
            .push(TranscriptEntry::FinalAnswer { text: answer.into() });
        self.iteration_count = self.iteration_count.max(1);
        self.status = RunStatus::Finished;
        Ok(())
    }

    /// Close the run as failed
    pub fn fail(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.status = RunStatus::Failed;
        Ok(())
    }

    /// Best partial result: the latest tool output, else the latest thought
    pub fn partial_result(&self) -> Option<String> {
        let entries = self.transcript.entries();
        entries
            .iter()
            .rev()
            .find_map(|e| match e {
                TranscriptEntry::Observation {
                    text,
                    source: ObservationSource::Tool,
                } => Some(text.clone()),
                _ => None,
            })
            .or_else(|| {
                entries.iter().rev().find_map(|e| match e {
                    TranscriptEntry::Thought { text } => Some(text.clone()),
                    _ => None,
                })
            })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(Error::RunClosed(self.id.to_string()))
        } else {
            Ok(())
        }
    }
}

/// Why a run stopped without a final answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AbortReason {
    /// Every allowed pass was used without a final answer
    IterationBudgetExhausted { max: usize },
    /// The language model could not be used
    ModelUnavailable { detail: String },
    /// The caller cancelled the run
    Cancelled,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IterationBudgetExhausted { max } => {
                write!(f, "iteration budget exhausted after {max} passes")
            }
            Self::ModelUnavailable { detail } => write!(f, "model unavailable: {detail}"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Result of a research run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed {
        answer: String,
    },
    Aborted {
        reason: AbortReason,
        partial: Option<String>,
    },
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// The final answer, if the run completed
    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Completed { answer } => Some(answer),
            Self::Aborted { .. } => None,
        }
    }
}

/// Outcome plus the full run, for display and diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub run: AgentRun,
}
