//! Research tools exposed to the agent loop
//!
//! Tools return their findings as text and never print. Failures come back
//! as errors, which the loop shows to the model as observations.

mod sec_filings;
mod sentiment;

pub use sec_filings::SecFilingsTool;
pub use sentiment::MarketSentimentTool;

use crate::api::{FilingProvider, SentimentProvider};
use agent_core::Result;
use agent_llm::LanguageModel;
use agent_prompt::PromptRegistry;
use agent_tools::ToolRegistry;
use std::sync::Arc;

/// Build the registry holding `SECFilings` and `MarketSentiment`
pub fn news_tool_registry(
    filings: Arc<dyn FilingProvider>,
    sentiment: Arc<dyn SentimentProvider>,
    summarizer: Arc<dyn LanguageModel>,
    prompts: Arc<PromptRegistry>,
) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SecFilingsTool::new(filings, summarizer, prompts)))?;
    registry.register(Arc::new(MarketSentimentTool::new(sentiment)))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockFilingProvider, MockSentimentProvider};
    use agent_llm::ScriptedModel;

    #[test]
    fn test_registry_names() {
        let registry = news_tool_registry(
            Arc::new(MockFilingProvider::new()),
            Arc::new(MockSentimentProvider::new()),
            Arc::new(ScriptedModel::new(Vec::<String>::new())),
            Arc::new(PromptRegistry::new()),
        )
        .unwrap();

        assert_eq!(registry.names(), vec!["SECFilings", "MarketSentiment"]);
        assert!(registry.resolve("SecFilings").is_err());
    }
}
