//! Headline sources
//!
//! A source is a fallible feed of headlines. [`collect_headlines`] fetches
//! every configured source and keeps going when some of them fail: an empty
//! or partial headline list is still worth analyzing.

mod finnhub;
mod yahoo;

pub use finnhub::FinnhubSource;
pub use yahoo::YahooFinanceSource;

use crate::config::{NewsConfig, SourceKind};
use crate::error::{NewsError, Result};
use crate::headline::Headline;
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// A feed of headlines
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    /// Stable identifier used in logs and failure reports
    fn id(&self) -> &str;

    /// Fetch the current headlines, in the order the source lists them
    async fn fetch(&self) -> Result<Vec<Headline>>;
}

/// A source that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source_id: String,
    pub detail: String,
}

/// Headlines from every source plus the sources that failed
#[derive(Debug, Clone, Default)]
pub struct HeadlineBatch {
    pub headlines: Vec<Headline>,
    pub failures: Vec<SourceFailure>,
}

impl HeadlineBatch {
    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty()
    }
}

/// Fetch all sources concurrently and concatenate their headlines in source order
pub async fn collect_headlines(sources: &[Arc<dyn HeadlineSource>]) -> HeadlineBatch {
    let results = join_all(sources.iter().map(|source| source.fetch())).await;

    let mut batch = HeadlineBatch::default();
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(headlines) => {
                info!(source = source.id(), count = headlines.len(), "Fetched headlines");
                batch.headlines.extend(headlines);
            }
            Err(e) => {
                warn!(source = source.id(), error = %e, "Headline source failed");
                let detail = match e {
                    NewsError::Fetch { detail, .. } => detail,
                    other => other.to_string(),
                };
                batch.failures.push(SourceFailure {
                    source_id: source.id().to_string(),
                    detail,
                });
            }
        }
    }
    batch
}

/// Build the sources named in `config`
pub fn sources_from_config(config: &NewsConfig) -> Result<Vec<Arc<dyn HeadlineSource>>> {
    config
        .sources
        .iter()
        .map(|kind| -> Result<Arc<dyn HeadlineSource>> {
            match kind {
                SourceKind::Yahoo => Ok(Arc::new(YahooFinanceSource::from_config(config)?)),
                SourceKind::Finnhub => Ok(Arc::new(FinnhubSource::from_config(config)?)),
            }
        })
        .collect()
}

pub(crate) fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| NewsError::Config(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headlines(texts: &[&str]) -> Vec<Headline> {
        texts.iter().filter_map(Headline::new).collect()
    }

    fn source(id: &'static str, result: fn() -> Result<Vec<Headline>>) -> Arc<dyn HeadlineSource> {
        let mut mock = MockHeadlineSource::new();
        mock.expect_id().return_const(id.to_string());
        mock.expect_fetch().times(1).returning(result);
        Arc::new(mock)
    }

    #[tokio::test]
    async fn test_collect_keeps_source_order() {
        let sources = vec![
            source("a", || Ok(headlines(&["A1", "A2"]))),
            source("b", || Ok(headlines(&["B1"]))),
        ];

        let batch = collect_headlines(&sources).await;
        let texts: Vec<&str> = batch.headlines.iter().map(Headline::as_str).collect();
        assert_eq!(texts, vec!["A1", "A2", "B1"]);
        assert!(batch.failures.is_empty());
    }

    #[tokio::test]
    async fn test_failed_source_is_recorded_not_fatal() {
        let sources = vec![
            source("broken", || Err(NewsError::fetch("broken", "no headlines found"))),
            source("ok", || Ok(headlines(&["Fed holds rates"]))),
        ];

        let batch = collect_headlines(&sources).await;
        assert_eq!(batch.headlines.len(), 1);
        assert_eq!(
            batch.failures,
            vec![SourceFailure {
                source_id: "broken".to_string(),
                detail: "no headlines found".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_all_sources_failing_gives_empty_batch() {
        let sources = vec![source("x", || Err(NewsError::NoJson))];
        let batch = collect_headlines(&sources).await;
        assert!(batch.is_empty());
        assert_eq!(batch.failures.len(), 1);
    }

    #[test]
    fn test_sources_from_config() {
        let config = NewsConfig {
            sources: vec![SourceKind::Yahoo, SourceKind::Finnhub],
            finnhub_api_key: Some("key".to_string()),
            ..NewsConfig::default()
        };
        let sources = sources_from_config(&config).unwrap();
        let ids: Vec<&str> = sources.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["yahoo", "finnhub"]);
    }
}
