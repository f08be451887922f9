//! LLM provider abstraction layer for newsdesk
//!
//! This crate provides provider-agnostic abstractions for interacting with
//! Large Language Models (LLMs). It includes:
//!
//! - Message and completion request/response types
//! - The [`LLMProvider`] trait for chat-style backends
//! - The [`LanguageModel`] capability (`generate(prompt) -> text`) used by agents
//! - [`ModelSet`] for picking a fast or a capable model per use
//! - [`ScriptedModel`], a deterministic stand-in for tests
//! - Concrete provider implementations (behind feature flags)

pub mod completion;
pub mod error;
pub mod messages;
pub mod model;
pub mod provider;
pub mod providers;
pub mod scripted;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use model::{LanguageModel, ModelSet, ModelTier, ProviderModel};
pub use provider::LLMProvider;
pub use scripted::ScriptedModel;
