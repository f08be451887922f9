//! Market sentiment from the CNN Fear & Greed index

use super::SentimentProvider;
use crate::config::NewsConfig;
use crate::error::{NewsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

const PROVIDER: &str = "Fear & Greed";
const FEAR_GREED_URL: &str = "https://production.dataviz.cnn.io/index/fearandgreed/graphdata";
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";

/// A sentiment score from 0 (extreme fear) to 100 (extreme greed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub score: f64,
    pub rating: String,
}

impl fmt::Display for SentimentReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Market sentiment: {} (score {:.0}/100)",
            self.rating,
            self.score.clamp(0.0, 100.0)
        )
    }
}

#[derive(Debug, Deserialize)]
struct GraphData {
    fear_and_greed: SentimentReading,
}

/// Client for CNN's Fear & Greed index
pub struct FearGreedClient {
    client: Client,
    url: String,
}

impl FearGreedClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: FEAR_GREED_URL.to_string(),
        }
    }

    pub fn from_config(config: &NewsConfig) -> Result<Self> {
        Ok(Self::new(crate::sources::http_client(config.request_timeout)?))
    }

    /// Decode the graph data payload
    pub fn parse(body: &str) -> Result<SentimentReading> {
        let data: GraphData = serde_json::from_str(body)?;
        Ok(data.fear_and_greed)
    }
}

#[async_trait]
impl SentimentProvider for FearGreedClient {
    #[instrument(skip(self))]
    async fn current(&self) -> Result<SentimentReading> {
        let response = self
            .client
            .get(&self.url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NewsError::api(PROVIDER, format!("HTTP {}", response.status())));
        }

        let reading = Self::parse(&response.text().await?)?;
        debug!(score = reading.score, rating = %reading.rating, "Sentiment reading");
        Ok(reading)
    }
}
