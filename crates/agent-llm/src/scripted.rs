//! Deterministic stand-in model for tests and dry runs

use crate::{LLMError, LanguageModel, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// A [`LanguageModel`] that replays a fixed script
///
/// Replies are returned in order. Once the script runs out, the last reply is
/// repeated if [`repeat_last`](Self::repeat_last) was set, otherwise every
/// further call fails. Every prompt received is recorded.
///
/// ```
/// use agent_llm::{LanguageModel, ScriptedModel};
///
/// # tokio_test::block_on(async {
/// let model = ScriptedModel::new(["Final Answer: done"]);
/// assert_eq!(model.generate("goal").await.unwrap(), "Final Answer: done");
/// assert_eq!(model.prompts(), vec!["goal".to_string()]);
/// # });
/// ```
#[derive(Debug)]
pub struct ScriptedModel {
    model_id: String,
    state: Mutex<ScriptState>,
    repeat_last: bool,
    unavailable: bool,
}

#[derive(Debug, Default)]
struct ScriptState {
    replies: VecDeque<String>,
    last: Option<String>,
    prompts: Vec<String>,
}

impl ScriptedModel {
    /// Create a model that returns `replies` in order
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            model_id: "scripted".to_string(),
            state: Mutex::new(ScriptState {
                replies: replies.into_iter().map(Into::into).collect(),
                ..ScriptState::default()
            }),
            repeat_last: false,
            unavailable: false,
        }
    }

    /// Create a model that returns `reply` on every call
    pub fn repeating(reply: impl Into<String>) -> Self {
        Self::new([reply.into()]).repeat_last()
    }

    /// Create a model whose backend can never be reached
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(Vec::<String>::new())
        }
    }

    /// Keep returning the final reply once the script is exhausted
    pub fn repeat_last(mut self) -> Self {
        self.repeat_last = true;
        self
    }

    /// Override the reported model id
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    /// Number of calls made so far
    pub fn calls(&self) -> usize {
        self.lock().prompts.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let mut state = self.lock();
        state.prompts.push(prompt.to_string());

        if self.unavailable {
            return Err(LLMError::Unavailable(format!(
                "{} is not reachable",
                self.model_id
            )));
        }

        if let Some(reply) = state.replies.pop_front() {
            state.last = Some(reply.clone());
            return Ok(reply);
        }

        match (&state.last, self.repeat_last) {
            (Some(last), true) => Ok(last.clone()),
            _ => Err(LLMError::UnexpectedResponse(format!(
                "script exhausted after {} calls",
                state.prompts.len() - 1
            ))),
        }
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_fails() {
        let model = ScriptedModel::new(["one", "two"]);
        assert_eq!(model.generate("a").await.unwrap(), "one");
        assert_eq!(model.generate("b").await.unwrap(), "two");
        assert!(matches!(
            model.generate("c").await,
            Err(LLMError::UnexpectedResponse(_))
        ));
        assert_eq!(model.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_repeating() {
        let model = ScriptedModel::repeating("garbage");
        for _ in 0..4 {
            assert_eq!(model.generate("p").await.unwrap(), "garbage");
        }
        assert_eq!(model.calls(), 4);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let model = ScriptedModel::unavailable().with_model_id("llama3");
        let err = model.generate("p").await.unwrap_err();
        assert!(matches!(err, LLMError::Unavailable(ref m) if m.contains("llama3")));
    }

    #[tokio::test]
    async fn test_stop_sequences_fall_back_to_generate() {
        let model = ScriptedModel::new(["Thought: x"]);
        let text = model
            .generate_until("p", &["\nObservation:".to_string()])
            .await
            .unwrap();
        assert_eq!(text, "Thought: x");
    }
}
