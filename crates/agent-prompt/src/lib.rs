//! Prompt template management for newsdesk
//!
//! Templates are Jinja2 (MiniJinja) sources rendered with strict undefined
//! handling: a template that references a variable the caller did not supply
//! fails with [`PromptError::MissingVariable`] instead of rendering an empty
//! string. Rendering is pure, so identical inputs always give identical
//! prompts.
//!
//! # Using the Registry
//!
//! ```
//! use agent_prompt::{JinjaTemplate, PromptRegistry};
//! use serde_json::json;
//!
//! let registry = PromptRegistry::new();
//! registry.register(JinjaTemplate::new("news.greeting", "Analyze {{ ticker }}").unwrap());
//!
//! let prompt = registry.render("news.greeting", &json!({ "ticker": "IBM" })).unwrap();
//! assert_eq!(prompt, "Analyze IBM");
//! ```
//!
//! # Using the Builder
//!
//! ```
//! use agent_prompt::PromptBuilder;
//!
//! let text = PromptBuilder::new()
//!     .text("Daily brief")
//!     .section("Headlines")
//!     .bullet("Stocks rally")
//!     .build();
//!
//! assert!(text.contains("## Headlines"));
//! ```
//!
//! # Feature Flags
//!
//! - `file-loader` (default): load template overrides from a directory
//! - `core-integration`: conversion into `agent_core::Error`

mod builder;
mod error;
mod jinja;
mod registry;

#[cfg(feature = "file-loader")]
mod loader;

pub use builder::PromptBuilder;
pub use error::{PromptError, Result};
pub use jinja::{JinjaTemplate, PromptTemplate};
pub use registry::PromptRegistry;

#[cfg(feature = "file-loader")]
pub use loader::FileLoader;
