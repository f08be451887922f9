//! The text-in/text-out model capability used by agents
//!
//! Agents never talk to an [`LLMProvider`] directly. They hold a
//! [`LanguageModel`], which reduces a completion API to
//! `generate(prompt) -> text`, and pick one per use through a [`ModelSet`].

use crate::{CompletionRequest, LLMProvider, Message, Result};
use agent_utils::preview;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A model that turns a prompt into text
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a reply to `prompt`
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate a reply, asking the backend to stop at any of `stop`
    ///
    /// Models that cannot honour stop sequences fall back to [`generate`](Self::generate);
    /// callers must tolerate text past a stop marker.
    async fn generate_until(&self, prompt: &str, stop: &[String]) -> Result<String> {
        let _ = stop;
        self.generate(prompt).await
    }

    /// Identifier of the backing model (e.g. "llama3")
    fn model_id(&self) -> &str;
}

/// Adapts an [`LLMProvider`] plus sampling settings into a [`LanguageModel`]
///
/// Each prompt is sent as a single user message.
pub struct ProviderModel {
    provider: Arc<dyn LLMProvider>,
    model: String,
    system: Option<String>,
    max_tokens: usize,
    temperature: Option<f32>,
}

impl ProviderModel {
    /// Create a model backed by `provider` using model id `model`
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            system: None,
            max_tokens: 2048,
            temperature: None,
        }
    }

    /// Set a system prompt sent with every request
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the maximum tokens per reply
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn request(&self, prompt: &str, stop: &[String]) -> CompletionRequest {
        let mut builder = CompletionRequest::builder(&self.model)
            .add_message(Message::user(prompt))
            .max_tokens(self.max_tokens)
            .stop_sequences(stop.to_vec());
        if let Some(system) = &self.system {
            builder = builder.system(system);
        }
        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }
        builder.build()
    }
}

#[async_trait]
impl LanguageModel for ProviderModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_until(prompt, &[]).await
    }

    #[instrument(skip(self, prompt, stop), fields(provider = self.provider.name(), model = %self.model))]
    async fn generate_until(&self, prompt: &str, stop: &[String]) -> Result<String> {
        let response = self.provider.complete(self.request(prompt, stop)).await?;
        debug!(
            stop_reason = ?response.stop_reason,
            total_tokens = response.usage.total(),
            reply = %preview(&response.message.content, 160),
            "Model replied"
        );
        Ok(response.message.content)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// Which model a use site wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Cheap, low-latency model (headline analysis)
    Fast,
    /// Higher-quality model (research, filing summaries)
    #[default]
    Capable,
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelTier::Fast => f.write_str("fast"),
            ModelTier::Capable => f.write_str("capable"),
        }
    }
}

/// The models available to agents, one per tier
#[derive(Clone)]
pub struct ModelSet {
    fast: Arc<dyn LanguageModel>,
    capable: Arc<dyn LanguageModel>,
}

impl ModelSet {
    /// Create a set from a fast and a capable model
    pub fn new(fast: Arc<dyn LanguageModel>, capable: Arc<dyn LanguageModel>) -> Self {
        Self { fast, capable }
    }

    /// Use the same model for every tier
    pub fn uniform(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            fast: Arc::clone(&model),
            capable: model,
        }
    }

    /// The model for `tier`
    pub fn get(&self, tier: ModelTier) -> Arc<dyn LanguageModel> {
        match tier {
            ModelTier::Fast => Arc::clone(&self.fast),
            ModelTier::Capable => Arc::clone(&self.capable),
        }
    }
}

impl fmt::Debug for ModelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSet")
            .field("fast", &self.fast.model_id())
            .field("capable", &self.capable.model_id())
            .finish()
    }
}
