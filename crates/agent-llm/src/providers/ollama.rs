//! Ollama provider implementation
//!
//! Talks to a local (or remote) Ollama server through its chat endpoint
//! with streaming disabled. See: https://github.com/ollama/ollama/blob/main/docs/api.md
//!
//! ```no_run
//! use agent_llm::{CompletionRequest, LLMProvider, Message};
//! use agent_llm::providers::OllamaProvider;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OllamaProvider::from_env()?;
//! let request = CompletionRequest::builder("llama3")
//!     .add_message(Message::user("Hello!"))
//!     .build();
//! let response = provider.complete(request).await?;
//! println!("{}", response.message.text());
//! # Ok(())
//! # }
//! ```

use super::status_error;
use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, StopReason,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default Ollama endpoint
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for the Ollama provider
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Server base URL (default: "http://localhost:11434")
    pub base_url: String,

    /// Request timeout in seconds; local models can be slow to load
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OllamaConfig {
    /// Create a config pointing at the given server
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read `OLLAMA_BASE_URL`, falling back to the local default
    pub fn from_env() -> Self {
        std::env::var("OLLAMA_BASE_URL").map_or_else(|_| Self::default(), Self::new)
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

/// Ollama provider
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    /// Create a provider with custom configuration
    pub fn with_config(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Create a provider against the default local server
    pub fn new() -> Result<Self> {
        Self::with_config(OllamaConfig::default())
    }

    /// Create a provider from `OLLAMA_BASE_URL`
    pub fn from_env() -> Result<Self> {
        Self::with_config(OllamaConfig::from_env())
    }

    /// Get the current configuration
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    #[instrument(skip(self, request), fields(model = %request.model, base_url = %self.config.base_url))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = OllamaChatRequest::from_request(&request);

        let response = self
            .client
            .post(self.config.chat_url())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(status_error(status, error_text, &request.model));
        }

        let chat: OllamaChatResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        debug!(
            done_reason = chat.done_reason.as_deref().unwrap_or("unknown"),
            input_tokens = chat.prompt_eval_count,
            output_tokens = chat.eval_count,
            "Received Ollama response"
        );

        Ok(chat.into_completion())
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaChatRequest {
    fn from_request(request: &CompletionRequest) -> Self {
        Self {
            model: request.model.clone(),
            messages: request
                .messages_with_system()
                .into_iter()
                .map(|m| OllamaMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content,
                })
                .collect(),
            stream: false,
            options: OllamaOptions {
                num_predict: request.max_tokens,
                temperature: request.temperature,
                stop: request.stop_sequences.clone(),
            },
        }
    }
}

impl OllamaChatResponse {
    fn into_completion(self) -> CompletionResponse {
        // Ollama reports "stop" for both natural ends and stop sequences
        let stop_reason = match self.done_reason.as_deref() {
            Some("length") => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        };
        CompletionResponse {
            message: Message::assistant(self.message.content),
            stop_reason,
            usage: TokenUsage {
                input_tokens: self.prompt_eval_count,
                output_tokens: self.eval_count,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, DEFAULT_OLLAMA_BASE_URL);
        assert_eq!(
            OllamaConfig::new("http://gpu-box:11434/").chat_url(),
            "http://gpu-box:11434/api/chat"
        );
    }

    #[test]
    fn test_request_shape() {
        let request = CompletionRequest::builder("mistral")
            .system("Be terse")
            .add_message(Message::user("Hi"))
            .max_tokens(256)
            .stop_sequences(vec!["\nObservation:".to_string()])
            .build();

        let json = serde_json::to_value(OllamaChatRequest::from_request(&request)).unwrap();
        assert_eq!(json["model"], "mistral");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hi");
        assert_eq!(json["options"]["num_predict"], 256);
        assert_eq!(json["options"]["stop"][0], "\nObservation:");
        assert!(json["options"].get("temperature").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "model": "llama3",
            "message": {"role": "assistant", "content": "Final Answer: ok"},
            "done": true,
            "done_reason": "length",
            "prompt_eval_count": 12,
            "eval_count": 4
        }"#;
        let chat: OllamaChatResponse = serde_json::from_str(raw).unwrap();
        let completion = chat.into_completion();
        assert_eq!(completion.message.text(), "Final Answer: ok");
        assert_eq!(completion.stop_reason, StopReason::MaxTokens);
        assert_eq!(completion.usage.total(), 16);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        // Port 9 (discard) is closed on any sane test host
        let provider =
            OllamaProvider::with_config(OllamaConfig::new("http://127.0.0.1:9").with_timeout(5))
                .unwrap();
        let request = CompletionRequest::builder("llama3")
            .add_message(Message::user("ping"))
            .build();

        let err = provider.complete(request).await.unwrap_err();
        assert!(matches!(err, LLMError::Unavailable(_)), "got {err:?}");
    }
}
