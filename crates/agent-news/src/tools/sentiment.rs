//! `MarketSentiment` tool

use crate::api::SentimentProvider;
use agent_core::{Error, Result};
use agent_tools::Tool;
use async_trait::async_trait;
use std::sync::Arc;

pub(crate) const NAME: &str = "MarketSentiment";

/// Reports the current market-wide sentiment; ignores its input
pub struct MarketSentimentTool {
    provider: Arc<dyn SentimentProvider>,
}

impl MarketSentimentTool {
    pub fn new(provider: Arc<dyn SentimentProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for MarketSentimentTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Get the current overall market sentiment (fear or greed). Takes no input."
    }

    async fn invoke(&self, _input: &str) -> Result<String> {
        let reading = self
            .provider
            .current()
            .await
            .map_err(|e| Error::tool(NAME, e))?;
        Ok(reading.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockSentimentProvider, SentimentReading};
    use crate::error::NewsError;

    #[tokio::test]
    async fn test_fixed_format() {
        let mut provider = MockSentimentProvider::new();
        provider.expect_current().times(1).returning(|| {
            Ok(SentimentReading {
                score: 27.6,
                rating: "fear".to_string(),
            })
        });

        let tool = MarketSentimentTool::new(Arc::new(provider));
        let out = tool.invoke("anything").await.unwrap();
        assert_eq!(out, "Market sentiment: fear (score 28/100)");
    }

    #[tokio::test]
    async fn test_provider_failure_is_tool_error() {
        let mut provider = MockSentimentProvider::new();
        provider
            .expect_current()
            .returning(|| Err(NewsError::api("Fear & Greed", "HTTP 418")));

        let tool = MarketSentimentTool::new(Arc::new(provider));
        let err = tool.invoke("").await.unwrap_err();
        assert!(matches!(err, Error::ToolInvocation { ref tool, .. } if tool == "MarketSentiment"));
        assert!(err.to_string().contains("HTTP 418"));
    }
}
