//! Financial news desk built on the agent runtime
//!
//! This crate provides:
//! - Headline sources (Yahoo Finance scraping, Finnhub) and concurrent collection
//! - Data providers for SEC EDGAR annual reports and market sentiment
//! - The `SECFilings` and `MarketSentiment` research tools
//! - Prompt templates, report assembly, and the end-to-end [`NewsDesk`] pipeline
//!
//! # Example
//!
//! ```no_run
//! use agent_llm::{ModelSet, ScriptedModel};
//! use agent_news::{NewsConfig, NewsDesk};
//! use std::sync::Arc;
//!
//! # async fn example() -> agent_core::Result<()> {
//! let models = ModelSet::uniform(Arc::new(ScriptedModel::repeating("Final Answer: ok")));
//! let desk = NewsDesk::from_config(&NewsConfig::default(), models)?;
//!
//! let brief = desk.run(&["IBM".to_string()]).await?;
//! for report in &brief.reports {
//!     println!("{report}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod headline;
pub mod html;
pub mod json;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod sources;
pub mod tools;

pub use api::{FilingProvider, SentimentProvider};
pub use config::{NewsConfig, NewsConfigBuilder, ProviderKind, SourceKind};
pub use error::{NewsError, Result};
pub use headline::Headline;
pub use pipeline::{CompanyResearch, NewsBrief, NewsDesk, NewsDeskBuilder};
pub use report::{Report, ResearchSection, assemble_report};
pub use sources::{HeadlineBatch, HeadlineSource, SourceFailure, collect_headlines};
