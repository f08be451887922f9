//! Yahoo Finance latest-news scraper

use super::{HeadlineSource, http_client};
use crate::config::NewsConfig;
use crate::error::{NewsError, Result};
use crate::headline::Headline;
use crate::html::select_text;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use tracing::{debug, instrument};

const SOURCE_ID: &str = "yahoo";

/// Yahoo rejects requests without a browser-looking user agent
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15";

/// Headlines scraped from the `h3` elements of the Yahoo Finance news page
pub struct YahooFinanceSource {
    client: Client,
    url: String,
    generic: Vec<String>,
}

impl YahooFinanceSource {
    pub fn from_config(config: &NewsConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.request_timeout)?,
            url: config.yahoo_url.clone(),
            generic: config.generic_headlines.clone(),
        })
    }

    /// Extract headlines from a page, dropping generic section labels
    pub fn parse_page(&self, html: &str) -> Result<Vec<Headline>> {
        let headlines: Vec<Headline> = select_text(html, "h3")?
            .into_iter()
            .filter(|text| !self.generic.iter().any(|g| g == text))
            .filter_map(Headline::new)
            .collect();

        if headlines.is_empty() {
            return Err(NewsError::fetch(SOURCE_ID, "no headlines found"));
        }
        Ok(headlines)
    }
}

#[async_trait]
impl HeadlineSource for YahooFinanceSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<Headline>> {
        let response = self
            .client
            .get(&self.url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| NewsError::fetch(SOURCE_ID, e))?;

        if !response.status().is_success() {
            return Err(NewsError::fetch(
                SOURCE_ID,
                format!("HTTP {}", response.status()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NewsError::fetch(SOURCE_ID, e))?;
        debug!(bytes = body.len(), "Downloaded news page");

        self.parse_page(&body)
    }
}
