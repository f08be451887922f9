//! Finnhub general market news

use super::{HeadlineSource, http_client};
use crate::config::NewsConfig;
use crate::error::{NewsError, Result};
use crate::headline::Headline;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::instrument;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const SOURCE_ID: &str = "finnhub";
const FINNHUB_NEWS_URL: &str = "https://finnhub.io/api/v1/news";

/// Free tier allows 60 calls per minute
const DEFAULT_RATE_PER_MINUTE: u32 = 60;

/// Finnhub news article; only the fields used here
#[derive(Debug, Clone, Deserialize)]
pub struct FinnhubArticle {
    pub headline: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub datetime: i64,
}

/// Headlines from Finnhub's general news category
pub struct FinnhubSource {
    client: Client,
    api_key: String,
    category: String,
    rate_limiter: SharedRateLimiter,
}

impl FinnhubSource {
    /// Create a source with the default rate limit
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            category: "general".to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(
                NonZeroU32::new(DEFAULT_RATE_PER_MINUTE).unwrap_or(NonZeroU32::MIN),
            ))),
        }
    }

    pub fn from_config(config: &NewsConfig) -> Result<Self> {
        let api_key = config.finnhub_api_key.clone().ok_or_else(|| {
            NewsError::Config("FINNHUB_API_KEY is required for the finnhub source".to_string())
        })?;
        Ok(Self::new(http_client(config.request_timeout)?, api_key))
    }

    /// Use another news category (general, forex, crypto, merger)
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Headlines of the decoded articles, in API order
    pub fn headlines(articles: Vec<FinnhubArticle>) -> Vec<Headline> {
        articles
            .into_iter()
            .filter_map(|a| Headline::new(a.headline))
            .collect()
    }
}

#[async_trait]
impl HeadlineSource for FinnhubSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    #[instrument(skip(self), fields(category = %self.category))]
    async fn fetch(&self) -> Result<Vec<Headline>> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(FINNHUB_NEWS_URL)
            .query(&[("category", self.category.as_str()), ("token", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| NewsError::fetch(SOURCE_ID, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NewsError::fetch(SOURCE_ID, format!("HTTP {status}: {body}")));
        }

        let articles: Vec<FinnhubArticle> = response
            .json()
            .await
            .map_err(|e| NewsError::fetch(SOURCE_ID, format!("invalid response: {e}")))?;

        let headlines = Self::headlines(articles);
        if headlines.is_empty() {
            return Err(NewsError::fetch(SOURCE_ID, "no headlines found"));
        }
        Ok(headlines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headlines_from_articles() {
        let articles: Vec<FinnhubArticle> = serde_json::from_str(
            r#"[
                {"headline": "Treasury yields rise", "source": "Reuters", "datetime": 1700000000, "id": 1},
                {"headline": "  ", "source": "CNBC"},
                {"headline": "Apple unveils new chip"}
            ]"#,
        )
        .unwrap();

        let headlines = FinnhubSource::headlines(articles);
        let texts: Vec<&str> = headlines.iter().map(Headline::as_str).collect();
        assert_eq!(texts, vec!["Treasury yields rise", "Apple unveils new chip"]);
    }

    #[test]
    fn test_from_config_requires_key() {
        assert!(FinnhubSource::from_config(&NewsConfig::default()).is_err());

        let config = NewsConfig {
            finnhub_api_key: Some("key".to_string()),
            ..NewsConfig::default()
        };
        let source = FinnhubSource::from_config(&config).unwrap().with_category("forex");
        assert_eq!(source.category, "forex");
        assert_eq!(source.id(), "finnhub");
    }
}
