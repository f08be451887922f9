//! Model construction for the configured provider

use agent_llm::providers::{AnthropicProvider, OllamaProvider, OpenAIProvider};
use agent_llm::{LLMProvider, LanguageModel, ModelSet, ProviderModel};
use agent_news::{NewsConfig, ProviderKind};
use std::sync::Arc;

/// Connect to `config.provider`, reading credentials from the environment
pub fn provider_for(kind: ProviderKind) -> anyhow::Result<Arc<dyn LLMProvider>> {
    let provider: Arc<dyn LLMProvider> = match kind {
        ProviderKind::Ollama => Arc::new(OllamaProvider::from_env()?),
        ProviderKind::OpenAI => Arc::new(OpenAIProvider::from_env()?),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::from_env()?),
    };
    Ok(provider)
}

/// Fast and capable models from one provider
pub fn model_set(provider: &Arc<dyn LLMProvider>, config: &NewsConfig) -> ModelSet {
    let fast: Arc<dyn LanguageModel> =
        Arc::new(ProviderModel::new(Arc::clone(provider), &config.fast_model).with_temperature(0.2));
    let capable: Arc<dyn LanguageModel> =
        Arc::new(ProviderModel::new(Arc::clone(provider), &config.capable_model).with_temperature(0.0));
    ModelSet::new(fast, capable)
}
